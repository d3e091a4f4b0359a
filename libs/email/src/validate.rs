//! Structural validation of decoded requests.

use crate::models::EmailRequest;
use std::fmt;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The offending field (e.g. "addresses", "content")
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate a decoded request against its structural constraints.
///
/// Rules: `addresses` must contain at least one element, every address
/// `value` must be non-empty, and `content` must be non-empty. `subject`
/// and `is_html` are unconstrained.
///
/// Returns the (possibly empty) violation set; never panics. Deterministic
/// over its input.
pub fn validate(request: &EmailRequest) -> Vec<Violation> {
    let mut violations = Vec::new();

    if request.addresses.is_empty() {
        violations.push(Violation::new("addresses", "must not be empty"));
    }

    for (index, address) in request.addresses.iter().enumerate() {
        if address.value.is_empty() {
            violations.push(Violation::new(
                format!("addresses[{}].value", index),
                "must not be empty",
            ));
        }
    }

    if request.content.is_empty() {
        violations.push(Violation::new("content", "must not be empty"));
    }

    violations
}
