//! Transport-neutral send instructions.

use crate::models::{AddressRole, EmailRequest};

/// The body of an outbound message with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBody {
    /// Plain-text content
    Plain(String),
    /// Rich-text (HTML) content
    Html(String),
}

impl MailBody {
    /// The content string regardless of content type.
    pub fn content(&self) -> &str {
        match self {
            Self::Plain(content) | Self::Html(content) => content,
        }
    }
}

/// A transport-neutral, role-partitioned send instruction.
///
/// Built once per validated request, handed to the delivery provider, then
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendInstruction {
    /// Primary recipients
    pub to: Vec<String>,
    /// Carbon-copy recipients
    pub cc: Vec<String>,
    /// Blind-carbon-copy recipients
    pub bcc: Vec<String>,
    /// Subject, copied verbatim; the provider owns any default
    pub subject: Option<String>,
    /// Body with its content type
    pub body: MailBody,
}

impl SendInstruction {
    /// Map a validated request into a send instruction.
    ///
    /// Total over validated input: every address lands in exactly one group
    /// matching its role, preserving order within each group.
    pub fn from_request(request: &EmailRequest) -> Self {
        let mut to = Vec::new();
        let mut cc = Vec::new();
        let mut bcc = Vec::new();

        for address in &request.addresses {
            let group = match address.role {
                AddressRole::To => &mut to,
                AddressRole::Cc => &mut cc,
                AddressRole::Bcc => &mut bcc,
            };
            group.push(address.value.clone());
        }

        let body = if request.is_html {
            MailBody::Html(request.content.clone())
        } else {
            MailBody::Plain(request.content.clone())
        };

        Self {
            to,
            cc,
            bcc,
            subject: request.subject.clone(),
            body,
        }
    }

    /// Total number of recipients across all groups.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailAddress;

    #[test]
    fn test_partitions_by_role_preserving_order() {
        let request = EmailRequest {
            addresses: vec![
                EmailAddress::new("a@x.com", AddressRole::To),
                EmailAddress::new("b@x.com", AddressRole::Cc),
                EmailAddress::new("c@x.com", AddressRole::Bcc),
                EmailAddress::new("d@x.com", AddressRole::To),
            ],
            subject: Some("S".to_string()),
            is_html: false,
            content: "C".to_string(),
        };

        let instruction = SendInstruction::from_request(&request);

        assert_eq!(instruction.to, vec!["a@x.com", "d@x.com"]);
        assert_eq!(instruction.cc, vec!["b@x.com"]);
        assert_eq!(instruction.bcc, vec!["c@x.com"]);
        assert_eq!(instruction.recipient_count(), request.addresses.len());
    }

    #[test]
    fn test_plain_body() {
        let request = EmailRequest {
            addresses: vec![EmailAddress::to("a@x.com")],
            subject: Some("S".to_string()),
            is_html: false,
            content: "C".to_string(),
        };

        let instruction = SendInstruction::from_request(&request);
        assert_eq!(instruction.body, MailBody::Plain("C".to_string()));
        assert_eq!(instruction.subject.as_deref(), Some("S"));
    }

    #[test]
    fn test_html_body() {
        let request = EmailRequest {
            addresses: vec![EmailAddress::to("a@x.com")],
            subject: None,
            is_html: true,
            content: "<p>hi</p>".to_string(),
        };

        let instruction = SendInstruction::from_request(&request);
        assert_eq!(instruction.body, MailBody::Html("<p>hi</p>".to_string()));
        assert_eq!(instruction.body.content(), "<p>hi</p>");
        assert_eq!(instruction.subject, None);
    }
}
