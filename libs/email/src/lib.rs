//! E-mail actuator library with NATS JetStream support
//!
//! Receives structured e-mail-send requests from an inbound message stream,
//! validates them, maps them into transport-neutral send instructions, and
//! dispatches them through a delivery provider. The outcome of each attempt
//! decides the acknowledgement of the inbound message.
//!
//! ## Components
//!
//! - **Wire Models**: [`EmailRequest`], [`EmailAddress`], [`AddressRole`]
//! - **Validation**: [`validate`] returning a set of [`Violation`]s
//! - **Mapping**: [`SendInstruction`] with role-partitioned address groups
//! - **Providers**: SMTP via lettre, and a capturing mock for tests
//! - **Pipeline**: [`EmailActuator`], a `messaging::MessageHandler`
//!
//! ## Usage with NATS JetStream
//!
//! ```ignore
//! use email::{EmailActuator, EmailSendStream, SmtpProvider};
//! use messaging::nats::{NatsWorker, WorkerConfig};
//!
//! let actuator = EmailActuator::new(SmtpProvider::from_env()?);
//! let config = WorkerConfig::from_stream::<EmailSendStream>();
//! let worker = NatsWorker::new(jetstream, actuator, config).await?;
//! worker.run(shutdown_rx).await?;
//! ```

pub mod actuator;
pub mod error;
pub mod instruction;
pub mod models;
pub mod provider;
pub mod report;
pub mod streams;
pub mod validate;

pub use actuator::EmailActuator;
pub use error::ActuatorError;
pub use instruction::{MailBody, SendInstruction};
pub use models::{AddressRole, EmailAddress, EmailRequest};
pub use provider::{EmailProvider, MockProvider, SendResult, SmtpConfig, SmtpProvider};
pub use report::ProcessingOutcome;
pub use streams::EmailSendStream;
pub use validate::{validate, Violation};
