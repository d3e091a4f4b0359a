//! Stream definition for inbound e-mail-send requests.

use messaging::nats::StreamConfig;

/// NATS JetStream configuration for the e-mail-send stream.
pub struct EmailSendStream;

impl StreamConfig for EmailSendStream {
    /// JetStream stream name
    const STREAM_NAME: &'static str = "EMAIL_SEND";

    /// Consumer name for actuator instances
    const CONSUMER_NAME: &'static str = "email-actuator";

    /// Subject pattern for send requests
    const SUBJECT: &'static str = "email.send.>";

    /// Broker-side delivery bound; the actuator itself never retries
    const MAX_DELIVER: i64 = 3;

    /// Ack wait timeout (30 seconds)
    const ACK_WAIT_SECS: u64 = 30;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_config() {
        assert_eq!(EmailSendStream::STREAM_NAME, "EMAIL_SEND");
        assert_eq!(EmailSendStream::CONSUMER_NAME, "email-actuator");
        assert_eq!(EmailSendStream::SUBJECT, "email.send.>");
        assert_eq!(EmailSendStream::MAX_DELIVER, 3);
    }
}
