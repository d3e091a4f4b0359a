//! Error taxonomy for the actuator pipeline.

use crate::validate::Violation;
use thiserror::Error;

/// Failures of one pipeline invocation.
///
/// Every variant is contained within the invocation that produced it: it is
/// logged and surfaced as a negative acknowledgement, never propagated out
/// of the pipeline.
#[derive(Debug, Error)]
pub enum ActuatorError {
    /// Inbound payload could not be parsed into a request
    #[error("cannot decode the payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request was decodable but violates its structural constraints
    #[error("invalid request: {}", format_violations(.0))]
    Validation(Vec<Violation>),

    /// The delivery provider reported a failure
    #[error("cannot send the e-mail: {0}")]
    Delivery(String),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_violations() {
        let error = ActuatorError::Validation(vec![
            Violation::new("addresses", "must not be empty"),
            Violation::new("content", "must not be empty"),
        ]);

        let rendered = error.to_string();
        assert!(rendered.contains("addresses: must not be empty"));
        assert!(rendered.contains("content: must not be empty"));
    }

    #[test]
    fn test_decode_error_from_serde() {
        let decode_failure = serde_json::from_str::<crate::models::EmailRequest>("not json")
            .map_err(ActuatorError::from)
            .unwrap_err();
        assert!(matches!(decode_failure, ActuatorError::Decode(_)));
    }
}
