//! Delivery provider implementations

pub mod mock;
pub mod smtp;

pub use mock::MockProvider;
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::instruction::SendInstruction;
use async_trait::async_trait;
use eyre::Result;

/// Result of a successful delivery.
#[derive(Debug)]
pub struct SendResult {
    /// Provider-specific message ID
    pub message_id: String,
}

/// Trait for delivery providers.
///
/// The actuator only depends on this two-outcome asynchronous contract:
/// one send attempt per instruction, resolving to success or an error.
/// Retry and timeout policy belong to the provider or the message source,
/// never to the caller.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Dispatch one send instruction.
    async fn send(&self, instruction: &SendInstruction) -> Result<SendResult>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<()>;

    /// Get provider name
    fn name(&self) -> &'static str;
}
