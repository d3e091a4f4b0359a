//! Mock delivery provider for testing

use super::{EmailProvider, SendResult};
use crate::instruction::SendInstruction;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock provider that captures dispatched instructions.
///
/// Clones share the capture store, so a cloned handle can assert on what an
/// actuator owning the original dispatched.
#[derive(Clone)]
pub struct MockProvider {
    sent: Arc<Mutex<Vec<SendInstruction>>>,
    should_fail: bool,
    failure_message: Option<String>,
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
            failure_message: None,
        }
    }

    /// Create a mock provider that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
            failure_message: Some(message.into()),
        }
    }

    /// Get all dispatched instructions
    pub async fn sent(&self) -> Vec<SendInstruction> {
        self.sent.lock().await.clone()
    }

    /// Get the count of dispatched instructions
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Check if an instruction was dispatched to a specific primary address
    pub async fn was_sent_to(&self, address: &str) -> bool {
        self.sent
            .lock()
            .await
            .iter()
            .any(|i| i.to.iter().any(|a| a == address))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockProvider {
    async fn send(&self, instruction: &SendInstruction) -> Result<SendResult> {
        if self.should_fail {
            let message = self
                .failure_message
                .clone()
                .unwrap_or_else(|| "Mock failure".to_string());
            return Err(eyre::eyre!(message));
        }

        let mut sent = self.sent.lock().await;
        sent.push(instruction.clone());

        Ok(SendResult {
            message_id: format!("mock-{}", sent.len()),
        })
    }

    async fn health_check(&self) -> Result<()> {
        if self.should_fail {
            return Err(eyre::eyre!("Mock health check failed"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::MailBody;

    fn instruction() -> SendInstruction {
        SendInstruction {
            to: vec!["test@example.com".to_string()],
            cc: vec![],
            bcc: vec![],
            subject: Some("Test Subject".to_string()),
            body: MailBody::Plain("Test body".to_string()),
        }
    }

    #[tokio::test]
    async fn test_mock_provider_captures_instruction() {
        let provider = MockProvider::new();

        let result = provider.send(&instruction()).await;
        assert!(result.is_ok());

        let sent = provider.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["test@example.com"]);
        assert!(provider.was_sent_to("test@example.com").await);
        assert!(!provider.was_sent_to("other@example.com").await);
    }

    #[tokio::test]
    async fn test_mock_provider_fails() {
        let provider = MockProvider::failing("Simulated failure");

        let result = provider.send(&instruction()).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Simulated failure"));
        assert_eq!(provider.sent_count().await, 0);
        assert!(provider.health_check().await.is_err());
    }
}
