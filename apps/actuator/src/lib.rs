//! E-Mail Actuator Service (NATS JetStream)
//!
//! A background worker that turns e-mail-send requests from NATS JetStream
//! into SMTP deliveries.
//!
//! ## Architecture
//!
//! ```text
//! NATS JetStream (EMAIL_SEND stream)
//!   ↓ (Pull Consumer: email-actuator)
//! NatsWorker<EmailActuator>
//!   ↓ (decode → validate → map)
//! EmailProvider (SMTP via lettre)
//!   ↓
//! ack / nack back to the stream
//! ```
//!
//! ## Features
//!
//! - NATS JetStream for durable message queues
//! - Pull-based consumer with ack/nak semantics
//! - Exactly one send attempt and one acknowledgement per message
//! - Graceful shutdown handling
//! - Health check endpoints for Kubernetes probes
//! - Prometheus metrics

use core_config::{app_info, Environment};
use email::{EmailActuator, EmailSendStream, SmtpProvider};
use eyre::{Result, WrapErr};
use messaging::nats::{HealthServer, NatsWorker, WorkerConfig};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Run the e-mail actuator.
///
/// This is the main entry point for the worker. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to NATS with JetStream
/// 3. Selects the SMTP provider (authenticated relay for prod, Mailpit for dev)
/// 4. Starts the worker with graceful shutdown handling
///
/// # Errors
///
/// Returns an error if:
/// - NATS connection fails
/// - JetStream is not available
/// - SMTP provider configuration is invalid
/// - The worker encounters a fatal error
pub async fn run() -> Result<()> {
    core_config::tracing::install_color_eyre();

    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let metrics_handle = messaging::nats::metrics::init_metrics();

    let app_info = app_info!();
    info!(
        name = %app_info.name,
        version = %app_info.version,
        environment = ?environment,
        "Starting e-mail actuator service"
    );

    let health_port: u16 = std::env::var("EMAIL_ACTUATOR_HEALTH_PORT")
        .or_else(|_| std::env::var("HEALTH_PORT"))
        .unwrap_or_else(|_| "8081".to_string())
        .parse()
        .unwrap_or(8081);

    let nats_url =
        std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string());

    info!(url = %nats_url, "Connecting to NATS...");
    let nats_client = async_nats::connect(&nats_url)
        .await
        .wrap_err_with(|| format!("Failed to connect to NATS at {}", nats_url))?;
    info!("Connected to NATS successfully");

    let jetstream = async_nats::jetstream::new(nats_client);

    let worker_config =
        WorkerConfig::from_stream::<EmailSendStream>().with_health_port(health_port);

    info!(
        stream = %worker_config.stream_name,
        consumer = %worker_config.consumer_name,
        durable = %worker_config.durable_name,
        "Worker configuration loaded"
    );

    let provider = match environment {
        Environment::Production => {
            info!("Using authenticated SMTP relay for production");
            SmtpProvider::from_env().wrap_err(
                "SMTP configuration error. Ensure SMTP_HOST and EMAIL_FROM_ADDRESS are set.",
            )?
        }
        Environment::Development => {
            info!("Using Mailpit SMTP provider for development");
            SmtpProvider::mailpit().wrap_err("SMTP configuration error")?
        }
    };

    let actuator = EmailActuator::new(provider);

    // Shutdown signal plumbing
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            error!("Error waiting for shutdown signal: {}", e);
        }
        let _ = shutdown_tx.send(true);
    });

    let health_server = HealthServer::new(health_port).with_metrics(metrics_handle);
    let health_state = health_server.state();
    tokio::spawn(async move {
        if let Err(e) = health_server.run().await {
            error!(error = %e, "Health server failed");
        }
    });

    let worker = NatsWorker::new(jetstream, actuator, worker_config)
        .await
        .wrap_err("Failed to create NATS worker")?;

    // Probe the provider once at startup; a dead relay flips readiness
    // but the worker still starts (the relay may come up later).
    let healthy = worker.handler_healthy().await;
    health_state.set_handler_healthy(healthy).await;
    if !healthy {
        warn!("Delivery provider health check failed at startup");
    }

    info!("NATS worker created, starting processing...");
    worker
        .run(shutdown_rx)
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    info!("E-mail actuator service stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }

    Ok(())
}
