//! Handler trait for inbound message processing.

use async_trait::async_trait;

/// Acknowledgement directive produced by a handler for one inbound message.
///
/// The worker executes exactly one of these against the queue's
/// acknowledgement primitive. A `Nack` carries the failure cause for
/// operator visibility; redelivery is the broker's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Processing succeeded; remove the message from the redelivery queue.
    Ack,
    /// Processing failed; request redelivery (or dead-lettering) with the
    /// given cause.
    Nack(String),
}

impl Disposition {
    /// Build a `Nack` from any displayable cause.
    pub fn nack(cause: impl Into<String>) -> Self {
        Self::Nack(cause.into())
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, Self::Ack)
    }
}

/// Message handler trait.
///
/// Implement this to define how one inbound message is processed. The
/// handler is invoked once per message, concurrently across distinct
/// messages, and must be stateless with respect to individual invocations.
///
/// The handler receives the raw payload bytes: decoding is part of the
/// handler's pipeline so that a malformed payload yields a `Nack` (with the
/// decode error logged) instead of being silently dropped by the consumer.
///
/// # Example
///
/// ```rust,ignore
/// struct EmailActuator<P> {
///     provider: P,
/// }
///
/// #[async_trait]
/// impl<P: EmailProvider> MessageHandler for EmailActuator<P> {
///     async fn handle(&self, payload: &[u8]) -> Disposition {
///         match self.process(payload).await {
///             Ok(()) => Disposition::Ack,
///             Err(e) => Disposition::nack(e.to_string()),
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "email_actuator"
///     }
/// }
/// ```
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Process one inbound message and decide its acknowledgement.
    ///
    /// Must never panic on malformed input; failures are reported through
    /// the returned `Disposition`, not raised.
    async fn handle(&self, payload: &[u8]) -> Disposition;

    /// Handler name, used for logging and metrics labels.
    fn name(&self) -> &'static str;

    /// Downstream health check, surfaced by the worker's readiness probe.
    async fn health_check(&self) -> bool {
        true
    }
}

/// A handler that acks everything (for testing).
#[derive(Debug, Clone, Default)]
pub struct AckAllHandler;

#[async_trait]
impl MessageHandler for AckAllHandler {
    async fn handle(&self, _payload: &[u8]) -> Disposition {
        Disposition::Ack
    }

    fn name(&self) -> &'static str {
        "ack_all_handler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ack_all_handler() {
        let handler = AckAllHandler;
        assert_eq!(handler.handle(b"anything").await, Disposition::Ack);
        assert_eq!(handler.name(), "ack_all_handler");
        assert!(handler.health_check().await);
    }

    #[test]
    fn test_disposition_nack_cause() {
        let disposition = Disposition::nack("provider rejected the message");
        assert!(!disposition.is_ack());
        assert_eq!(
            disposition,
            Disposition::Nack("provider rejected the message".to_string())
        );
    }
}
