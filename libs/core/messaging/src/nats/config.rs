//! Configuration for NATS JetStream workers.

use std::time::Duration;

/// Stream configuration trait (type-safe constants).
///
/// Implement this trait to define a stream's NATS configuration.
///
/// # Example
///
/// ```rust,ignore
/// struct EmailSendStream;
///
/// impl StreamConfig for EmailSendStream {
///     const STREAM_NAME: &'static str = "EMAIL_SEND";
///     const CONSUMER_NAME: &'static str = "email-actuator";
///     const SUBJECT: &'static str = "email.send.>";
/// }
/// ```
pub trait StreamConfig {
    /// JetStream stream name (e.g., "EMAIL_SEND")
    const STREAM_NAME: &'static str;

    /// Consumer name (e.g., "email-actuator")
    const CONSUMER_NAME: &'static str;

    /// Subject pattern (e.g., "email.send.>")
    const SUBJECT: &'static str = ">";

    /// Maximum broker-side deliveries of one message (default: 3).
    /// Bounds redelivery after naks; this crate never retries internally.
    const MAX_DELIVER: i64 = 3;

    /// Ack wait timeout in seconds (default: 30)
    const ACK_WAIT_SECS: u64 = 30;
}

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// JetStream stream name
    pub stream_name: String,

    /// Consumer name
    pub consumer_name: String,

    /// Consumer durable name (unique per worker instance)
    pub durable_name: String,

    /// Subject to subscribe to
    pub subject: String,

    /// Batch size for fetching messages
    pub batch_size: usize,

    /// Fetch timeout
    pub fetch_timeout: Duration,

    /// Maximum broker-side deliveries of one message
    pub max_deliver: i64,

    /// Ack wait timeout
    pub ack_wait: Duration,

    /// Maximum concurrently processed messages
    pub max_concurrent: usize,

    /// Health server port
    pub health_port: u16,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            stream_name: "MESSAGES".to_string(),
            consumer_name: "worker".to_string(),
            durable_name: format!("worker-{}", uuid::Uuid::new_v4()),
            subject: ">".to_string(),
            batch_size: 10,
            fetch_timeout: Duration::from_secs(5),
            max_deliver: 3,
            ack_wait: Duration::from_secs(30),
            max_concurrent: 4,
            health_port: 8081,
        }
    }
}

impl WorkerConfig {
    /// Create a new worker configuration with the given stream name.
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            ..Default::default()
        }
    }

    /// Create from a StreamConfig trait.
    pub fn from_stream<S: StreamConfig>() -> Self {
        Self {
            stream_name: S::STREAM_NAME.to_string(),
            consumer_name: S::CONSUMER_NAME.to_string(),
            durable_name: format!("{}-{}", S::CONSUMER_NAME, uuid::Uuid::new_v4()),
            subject: S::SUBJECT.to_string(),
            max_deliver: S::MAX_DELIVER,
            ack_wait: Duration::from_secs(S::ACK_WAIT_SECS),
            ..Default::default()
        }
    }

    /// Set the durable name.
    pub fn with_durable_name(mut self, name: impl Into<String>) -> Self {
        self.durable_name = name.into();
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the maximum number of concurrently processed messages.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Set the health server port.
    pub fn with_health_port(mut self, port: u16) -> Self {
        self.health_port = port;
        self
    }
}
