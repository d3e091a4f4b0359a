//! SMTP delivery provider using lettre

use super::{EmailProvider, SendResult};
use crate::instruction::{MailBody, SendInstruction};
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

/// SMTP provider configuration
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub use_tls: bool,
}

/// SMTP delivery provider
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: Arc<SmtpConfig>,
}

impl SmtpProvider {
    /// Create a new SMTP provider
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let transport = if config.use_tls {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .wrap_err("Failed to create SMTP relay")?
                .credentials(creds)
                .port(config.port)
                .build()
        } else if !config.username.is_empty() {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .credentials(creds)
                .port(config.port)
                .build()
        } else {
            // No auth (for Mailpit/Mailhog)
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        };

        Ok(Self {
            transport,
            config: Arc::new(config),
        })
    }

    /// Create a provider for Mailpit/Mailhog (local development)
    ///
    /// Connects to localhost:1025 without authentication.
    pub fn mailpit() -> Result<Self> {
        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .unwrap_or(1025);

        let config = SmtpConfig {
            host,
            port,
            username: String::new(),
            password: String::new(),
            from_email: std::env::var("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "noreply@localhost".to_string()),
            from_name: std::env::var("EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "Development".to_string()),
            use_tls: false,
        };

        Self::new(config)
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        let config = SmtpConfig {
            host: std::env::var("SMTP_HOST").wrap_err("SMTP_HOST not set")?,
            port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .wrap_err("Invalid SMTP_PORT")?,
            username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: std::env::var("EMAIL_FROM_ADDRESS")
                .wrap_err("EMAIL_FROM_ADDRESS not set")?,
            from_name: std::env::var("EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "Notifications".to_string()),
            use_tls: std::env::var("SMTP_USE_TLS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        };

        Self::new(config)
    }

    fn build_message(&self, instruction: &SendInstruction) -> Result<Message> {
        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .wrap_err("Invalid from address")?;

        // Subject may be absent; an empty header is the provider-side default
        let mut builder = Message::builder()
            .from(from)
            .subject(instruction.subject.as_deref().unwrap_or_default());

        for to in &instruction.to {
            let mailbox: Mailbox = to.parse().wrap_err("Invalid to address")?;
            builder = builder.to(mailbox);
        }

        for cc in &instruction.cc {
            let mailbox: Mailbox = cc.parse().wrap_err("Invalid CC address")?;
            builder = builder.cc(mailbox);
        }

        for bcc in &instruction.bcc {
            let mailbox: Mailbox = bcc.parse().wrap_err("Invalid BCC address")?;
            builder = builder.bcc(mailbox);
        }

        let message = match &instruction.body {
            MailBody::Plain(text) => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.clone())
                .wrap_err("Failed to build text message")?,
            MailBody::Html(html) => builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .wrap_err("Failed to build HTML message")?,
        };

        Ok(message)
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, instruction: &SendInstruction) -> Result<SendResult> {
        let message = self.build_message(instruction)?;

        let response = self
            .transport
            .send(message)
            .await
            .wrap_err("Failed to send e-mail via SMTP")?;

        let message_id = response
            .message()
            .next()
            .map(|s| s.to_string())
            .unwrap_or_default();

        Ok(SendResult { message_id })
    }

    async fn health_check(&self) -> Result<()> {
        self.transport
            .test_connection()
            .await
            .wrap_err("SMTP health check failed")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressRole, EmailAddress, EmailRequest};

    fn provider() -> SmtpProvider {
        SmtpProvider::new(SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            username: String::new(),
            password: String::new(),
            from_email: "noreply@localhost".to_string(),
            from_name: "Test".to_string(),
            use_tls: false,
        })
        .unwrap()
    }

    #[test]
    fn test_build_message_all_groups() {
        let request = EmailRequest {
            addresses: vec![
                EmailAddress::new("a@x.com", AddressRole::To),
                EmailAddress::new("b@x.com", AddressRole::Cc),
                EmailAddress::new("c@x.com", AddressRole::Bcc),
            ],
            subject: Some("S".to_string()),
            is_html: false,
            content: "C".to_string(),
        };
        let instruction = SendInstruction::from_request(&request);

        let message = provider().build_message(&instruction).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();

        assert!(rendered.contains("To: a@x.com"));
        assert!(rendered.contains("Cc: b@x.com"));
        assert!(rendered.contains("Subject: S"));
        // BCC recipients are addressed in the envelope, never in headers
        assert!(!rendered.contains("c@x.com"));
        assert!(message
            .envelope()
            .to()
            .iter()
            .any(|a| a.to_string() == "c@x.com"));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let instruction = SendInstruction {
            to: vec!["not an address".to_string()],
            cc: vec![],
            bcc: vec![],
            subject: None,
            body: MailBody::Plain("C".to_string()),
        };

        assert!(provider().build_message(&instruction).is_err());
    }

    #[test]
    fn test_build_message_html_content_type() {
        let instruction = SendInstruction {
            to: vec!["a@x.com".to_string()],
            cc: vec![],
            bcc: vec![],
            subject: None,
            body: MailBody::Html("<p>hi</p>".to_string()),
        };

        let message = provider().build_message(&instruction).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Content-Type: text/html"));
    }
}
