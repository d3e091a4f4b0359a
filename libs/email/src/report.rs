//! Outcome reporting: one log record and one acknowledgement directive
//! per pipeline invocation.

use crate::models::EmailRequest;
use messaging::Disposition;
use tracing::{error, info};

/// Terminal outcome of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The provider accepted the e-mail
    Delivered,
    /// Delivery failed with the given reason
    Failed(String),
}

/// Report an outcome: emit exactly one log entry embedding the original
/// request for traceability, and return the matching acknowledgement
/// directive. Never swallows an outcome.
pub fn report(outcome: ProcessingOutcome, request: &EmailRequest) -> Disposition {
    match outcome {
        ProcessingOutcome::Delivered => {
            info!(request = ?request, "Sent the e-mail");
            Disposition::Ack
        }
        ProcessingOutcome::Failed(reason) => {
            error!(request = ?request, reason = %reason, "Cannot send the e-mail");
            Disposition::Nack(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailAddress;

    fn request() -> EmailRequest {
        EmailRequest {
            addresses: vec![EmailAddress::to("a@x.com")],
            subject: Some("S".to_string()),
            is_html: false,
            content: "C".to_string(),
        }
    }

    #[test]
    fn test_delivered_acks() {
        assert_eq!(
            report(ProcessingOutcome::Delivered, &request()),
            Disposition::Ack
        );
    }

    #[test]
    fn test_failed_nacks_with_cause() {
        let disposition = report(
            ProcessingOutcome::Failed("connection refused".to_string()),
            &request(),
        );
        assert_eq!(
            disposition,
            Disposition::Nack("connection refused".to_string())
        );
    }
}
