//! NATS JetStream backend for message-driven handlers.
//!
//! Pull-based consumption with explicit ack/nak semantics:
//!
//! ```text
//! ┌────────────────┐     ┌─────────────────────┐     ┌────────────────┐
//! │   Publisher    │────▶│   NATS JetStream    │────▶│   NatsWorker   │
//! │  (upstream)    │     │   (durable stream)  │     │                │
//! └────────────────┘     └─────────────────────┘     └───────┬────────┘
//!                                  ▲                         │
//!                                  │ ack / nak               ▼
//!                                  └───────────────── MessageHandler
//! ```
//!
//! The worker fetches batches from a durable pull consumer, hands each raw
//! payload to the [`MessageHandler`](crate::MessageHandler), and issues the
//! returned disposition against the message. No retry logic lives here:
//! a nak leaves redelivery to the broker, bounded by the consumer's
//! `max_deliver`.

mod config;
mod consumer;
mod error;
mod health;
pub mod metrics;
mod worker;

pub use config::{StreamConfig, WorkerConfig};
pub use consumer::{InboundMessage, NatsConsumer, StreamInfo};
pub use error::NatsError;
pub use health::{HealthServer, HealthState, HealthStatus};
pub use metrics::{init_metrics, WorkerMetrics};
pub use worker::NatsWorker;
