//! NATS JetStream worker loop.
//!
//! Fetches message batches from a pull consumer and dispatches each message
//! to the handler concurrently, bounded by a semaphore. The handler's
//! [`Disposition`] is executed against the message as exactly one ack or nak.

use crate::handler::{Disposition, MessageHandler};
use crate::nats::config::WorkerConfig;
use crate::nats::consumer::{InboundMessage, NatsConsumer, StreamInfo};
use crate::nats::error::NatsError;
use crate::nats::metrics::WorkerMetrics;
use async_nats::jetstream::Context;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, info, warn};

/// NATS JetStream worker driving a [`MessageHandler`].
pub struct NatsWorker<H: MessageHandler> {
    consumer: NatsConsumer,
    handler: Arc<H>,
    config: WorkerConfig,
    metrics: Arc<WorkerMetrics>,
}

impl<H: MessageHandler + 'static> NatsWorker<H> {
    /// Create a new NATS worker, initializing the stream and consumer.
    pub async fn new(
        jetstream: Context,
        handler: H,
        config: WorkerConfig,
    ) -> Result<Self, NatsError> {
        let jetstream = Arc::new(jetstream);
        let metrics = Arc::new(WorkerMetrics::new(&config.stream_name, handler.name()));

        let consumer = NatsConsumer::new(jetstream, config.clone());
        consumer.init().await?;

        Ok(Self {
            consumer,
            handler: Arc::new(handler),
            config,
            metrics,
        })
    }

    /// Run the worker loop.
    ///
    /// The worker will:
    /// 1. Fetch messages in batches
    /// 2. Dispatch each message concurrently (up to max_concurrent)
    /// 3. Ack or nak each message per the handler's disposition
    /// 4. Handle shutdown gracefully, draining in-flight messages
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), NatsError> {
        info!(
            stream = %self.config.stream_name,
            consumer = %self.config.consumer_name,
            durable = %self.config.durable_name,
            max_concurrent = %self.config.max_concurrent,
            "Starting NATS worker"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping worker");
                        break;
                    }
                }

                result = self.process_batch() => {
                    if let Err(e) = result {
                        error!(error = %e, "Error processing batch");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        info!("NATS worker stopped");
        Ok(())
    }

    /// Process a batch of messages concurrently.
    async fn process_batch(&self) -> Result<(), NatsError> {
        let messages = self.consumer.fetch(self.config.batch_size).await?;

        if messages.is_empty() {
            // No messages, wait before next poll
            tokio::time::sleep(Duration::from_millis(100)).await;
            return Ok(());
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut handles = Vec::with_capacity(messages.len());

        for message in messages {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(NatsError::consumer)?;
            let handler = self.handler.clone();
            let metrics = self.metrics.clone();

            let handle = tokio::spawn(async move {
                let result = Self::dispatch(message, handler.as_ref(), metrics.as_ref()).await;
                drop(permit);
                result
            });

            handles.push(handle);
        }

        for handle in handles {
            match handle.await {
                Ok(Err(e)) => error!(error = %e, "Failed to acknowledge message"),
                Err(e) => error!(error = %e, "Dispatch task failed"),
                Ok(Ok(())) => {}
            }
        }

        Ok(())
    }

    /// Dispatch a single message to the handler and execute its disposition.
    ///
    /// The handler invocation is wrapped in `catch_unwind`: an unexpected
    /// panic is contained, logged with the raw payload, and turned into a
    /// nak rather than crashing the consumer.
    async fn dispatch(
        message: InboundMessage,
        handler: &H,
        metrics: &WorkerMetrics,
    ) -> Result<(), NatsError> {
        metrics.message_received();

        let sequence = message.sequence;
        if message.is_redelivery() {
            debug!(
                sequence,
                delivery_count = message.delivery_count,
                "Processing redelivered message"
            );
        }

        let start = Instant::now();
        let disposition = AssertUnwindSafe(handler.handle(message.payload()))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                error!(
                    sequence,
                    payload = %String::from_utf8_lossy(message.payload()),
                    "Handler panicked while processing message"
                );
                Disposition::nack("unexpected processing failure")
            });
        let duration = start.elapsed();

        match disposition {
            Disposition::Ack => {
                message.ack().await?;
                metrics.message_acked(duration);
                debug!(
                    sequence,
                    duration_ms = duration.as_millis(),
                    "Message acknowledged"
                );
            }
            Disposition::Nack(cause) => {
                message.nak().await?;
                metrics.message_nacked(duration);
                warn!(
                    sequence,
                    cause = %cause,
                    duration_ms = duration.as_millis(),
                    "Message negatively acknowledged"
                );
            }
        }

        Ok(())
    }

    /// Get stream info.
    pub async fn stream_info(&self) -> Result<StreamInfo, NatsError> {
        self.consumer.stream_info().await
    }

    /// Run the handler's health check.
    pub async fn handler_healthy(&self) -> bool {
        self.handler.health_check().await
    }
}
