//! Messaging abstractions for message-driven actuators.
//!
//! The core contract is [`MessageHandler`]: a handler receives the raw
//! payload of one inbound message and returns a [`Disposition`] telling the
//! queue side whether to acknowledge (`Ack`) or negatively acknowledge
//! (`Nack`) the message. The NATS JetStream backend in [`nats`] owns the
//! consumption loop and issues exactly one acknowledgement action per
//! message based on that disposition.

pub mod handler;
pub mod nats;

pub use handler::{Disposition, MessageHandler};
