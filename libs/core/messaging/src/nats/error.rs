//! Error types for the NATS backend.

use thiserror::Error;

/// Errors raised by the NATS JetStream consumption machinery.
#[derive(Debug, Error)]
pub enum NatsError {
    /// Stream lookup or creation failed
    #[error("stream error: {0}")]
    Stream(String),

    /// Consumer lookup, creation, or fetch failed
    #[error("consumer error: {0}")]
    Consumer(String),

    /// Acknowledgement action (ack/nak/term) failed
    #[error("acknowledgement error: {0}")]
    Ack(String),
}

impl NatsError {
    pub fn stream(error: impl std::fmt::Display) -> Self {
        Self::Stream(error.to_string())
    }

    pub fn consumer(error: impl std::fmt::Display) -> Self {
        Self::Consumer(error.to_string())
    }

    pub fn ack(error: impl std::fmt::Display) -> Self {
        Self::Ack(error.to_string())
    }
}
