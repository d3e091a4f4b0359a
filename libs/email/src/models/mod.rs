//! Wire models for inbound e-mail-send requests.

use serde::{Deserialize, Deserializer, Serialize};

/// Role of one e-mail participant.
///
/// Wire encoding is `"TO" | "CC" | "BCC"`. A missing or unrecognized tag
/// decodes to `To`: a schema that grows new roles degrades to the primary
/// group instead of rejecting the message.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AddressRole {
    /// Primary recipient
    #[default]
    To,
    /// Carbon copy
    Cc,
    /// Blind carbon copy
    Bcc,
}

impl AddressRole {
    fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(match tag.as_deref() {
            Some("CC") => Self::Cc,
            Some("BCC") => Self::Bcc,
            _ => Self::To,
        })
    }
}

/// One e-mail participant: an address string and its role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailAddress {
    /// The address of the participant (e.g. "user@example.com")
    pub value: String,

    /// The role of the participant, defaults to `To`
    #[serde(
        rename = "type",
        default,
        deserialize_with = "AddressRole::deserialize_lenient"
    )]
    pub role: AddressRole,
}

impl EmailAddress {
    /// Create an address with the given role.
    pub fn new(value: impl Into<String>, role: AddressRole) -> Self {
        Self {
            value: value.into(),
            role,
        }
    }

    /// Create a primary (`To`) address.
    pub fn to(value: impl Into<String>) -> Self {
        Self::new(value, AddressRole::To)
    }
}

/// One e-mail-send request, decoded from an inbound message.
///
/// Immutable after decode. `addresses` and `content` are required non-empty
/// by [`validate`](crate::validate::validate) before any send attempt;
/// `content` carries a serde default so an absent body surfaces as a
/// validation violation rather than a decode error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailRequest {
    /// The participants of the e-mail
    #[serde(default)]
    pub addresses: Vec<EmailAddress>,

    /// The subject of the e-mail
    #[serde(default)]
    pub subject: Option<String>,

    /// True when `content` is HTML
    #[serde(default)]
    pub is_html: bool,

    /// The content of the e-mail
    #[serde(default)]
    pub content: String,
}
