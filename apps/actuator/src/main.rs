//! E-Mail Actuator Service (NATS JetStream)
//!
//! Binary entry point for the NATS-based e-mail actuator.

#[tokio::main]
async fn main() {
    if let Err(e) = email_actuator::run().await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}
