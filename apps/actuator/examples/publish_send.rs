//! Test publisher for the e-mail actuator
//!
//! Run with: cargo run -p email_actuator --example publish_send

use email::models::{AddressRole, EmailAddress, EmailRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let nats_url =
        std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string());

    println!("Connecting to NATS at {}...", nats_url);
    let client = async_nats::connect(&nats_url).await?;
    let jetstream = async_nats::jetstream::new(client);

    // Ensure stream exists
    println!("Creating/getting EMAIL_SEND stream...");
    let stream_config = async_nats::jetstream::stream::Config {
        name: "EMAIL_SEND".to_string(),
        subjects: vec!["email.send.>".to_string()],
        retention: async_nats::jetstream::stream::RetentionPolicy::Limits,
        max_messages: 100_000,
        ..Default::default()
    };

    match jetstream.get_or_create_stream(stream_config).await {
        Ok(_) => println!("Stream EMAIL_SEND ready"),
        Err(e) => println!("Stream warning: {}", e),
    }

    let request = EmailRequest {
        addresses: vec![
            EmailAddress::new("test@example.com", AddressRole::To),
            EmailAddress::new("copy@example.com", AddressRole::Cc),
        ],
        subject: Some("Actuator test".to_string()),
        is_html: false,
        content: "Hello from the publish_send example.".to_string(),
    };

    let payload = serde_json::to_vec(&request)?;

    println!("Publishing send request to {} recipients", request.addresses.len());

    let ack = jetstream
        .publish("email.send.request", payload.into())
        .await?
        .await?;

    println!("Published! Stream sequence: {}", ack.sequence);
    println!("\nCheck the actuator logs and Mailpit at http://localhost:8025");

    Ok(())
}
