//! The actuator pipeline: decode, validate, map, send, report.

use crate::error::ActuatorError;
use crate::instruction::SendInstruction;
use crate::models::EmailRequest;
use crate::provider::EmailProvider;
use crate::report::{report, ProcessingOutcome};
use crate::validate::validate;
use async_trait::async_trait;
use messaging::{Disposition, MessageHandler};
use std::sync::Arc;
use tracing::{debug, error};

/// Message-driven e-mail actuator.
///
/// Processes one inbound message per invocation, statelessly and without
/// cross-request state, so any number of invocations may run concurrently.
/// Each invocation performs at most one send attempt and yields exactly one
/// acknowledgement directive:
///
/// 1. decode the payload into an [`EmailRequest`]; malformed payloads are
///    logged with the raw payload and nacked,
/// 2. validate; violations are logged and nacked without reaching the
///    provider,
/// 3. map the validated request into a [`SendInstruction`],
/// 4. dispatch through the provider (the single suspension point),
/// 5. report the outcome: ack on delivery, nack with the cause otherwise.
pub struct EmailActuator<P: EmailProvider> {
    provider: Arc<P>,
}

impl<P: EmailProvider> EmailActuator<P> {
    /// Create an actuator over the given delivery provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    async fn process(&self, payload: &[u8]) -> Disposition {
        let request: EmailRequest = match serde_json::from_slice(payload) {
            Ok(request) => request,
            Err(e) => {
                let cause = ActuatorError::from(e);
                error!(
                    payload = %String::from_utf8_lossy(payload),
                    error = %cause,
                    "Bad e-mail request message"
                );
                return Disposition::nack(cause.to_string());
            }
        };

        let violations = validate(&request);
        if !violations.is_empty() {
            let cause = ActuatorError::Validation(violations);
            error!(request = ?request, error = %cause, "Bad e-mail request message");
            return Disposition::nack(cause.to_string());
        }

        let instruction = SendInstruction::from_request(&request);
        debug!(
            to = instruction.to.len(),
            cc = instruction.cc.len(),
            bcc = instruction.bcc.len(),
            "Dispatching e-mail"
        );

        let outcome = match self.provider.send(&instruction).await {
            Ok(_) => ProcessingOutcome::Delivered,
            Err(e) => {
                ProcessingOutcome::Failed(ActuatorError::Delivery(e.to_string()).to_string())
            }
        };

        report(outcome, &request)
    }
}

#[async_trait]
impl<P: EmailProvider + 'static> MessageHandler for EmailActuator<P> {
    async fn handle(&self, payload: &[u8]) -> Disposition {
        self.process(payload).await
    }

    fn name(&self) -> &'static str {
        "email_actuator"
    }

    async fn health_check(&self) -> bool {
        self.provider.health_check().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;

    #[tokio::test]
    async fn test_actuator_name_and_health() {
        let actuator = EmailActuator::new(MockProvider::new());
        assert_eq!(actuator.name(), "email_actuator");
        assert!(actuator.health_check().await);

        let failing = EmailActuator::new(MockProvider::failing("down"));
        assert!(!failing.health_check().await);
    }
}
