//! Prometheus metrics for the NATS worker.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metrics for one worker instance.
#[derive(Clone)]
pub struct WorkerMetrics {
    stream_name: String,
    handler_name: String,
}

impl WorkerMetrics {
    /// Create new metrics.
    pub fn new(stream_name: &str, handler_name: &str) -> Self {
        Self {
            stream_name: stream_name.to_string(),
            handler_name: handler_name.to_string(),
        }
    }

    /// Record a message received from the stream.
    pub fn message_received(&self) {
        counter!(
            "nats_worker_messages_received_total",
            "stream" => self.stream_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .increment(1);
    }

    /// Record a message acknowledged after successful processing.
    pub fn message_acked(&self, duration: Duration) {
        counter!(
            "nats_worker_messages_acked_total",
            "stream" => self.stream_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .increment(1);

        self.record_duration(duration);
    }

    /// Record a message negatively acknowledged.
    pub fn message_nacked(&self, duration: Duration) {
        counter!(
            "nats_worker_messages_nacked_total",
            "stream" => self.stream_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .increment(1);

        self.record_duration(duration);
    }

    fn record_duration(&self, duration: Duration) {
        histogram!(
            "nats_worker_message_duration_seconds",
            "stream" => self.stream_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .record(duration.as_secs_f64());
    }
}

/// Initialize Prometheus metrics.
pub fn init_metrics() -> metrics_exporter_prometheus::PrometheusHandle {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}
