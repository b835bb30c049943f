//! SMTP Email Service Implementation
//!
//! Sends plain-text email through an SMTP relay using lettre's async
//! transport on the Tokio runtime.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, error, info};

use ot_shared::email::mask_email;

use super::email_service::EmailService;
use crate::config::{EmailConfig, SmtpSecurity};
use crate::InfrastructureError;

/// Email service delivering through an SMTP relay
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailService {
    /// Build the transport described by `config`
    ///
    /// No connection is opened until the first message is sent.
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            InfrastructureError::Config(format!(
                "Invalid sender address '{}': {}",
                config.from_address, e
            ))
        })?;

        let builder = match config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay: {}", e)))?,
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay: {}", e)))?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
        };

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            security = ?config.security,
            authenticated = config.has_credentials(),
            "SMTP email service configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Assemble a plain-text message
    pub fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, InfrastructureError> {
        let to: Mailbox = to.parse().map_err(|_| {
            InfrastructureError::Email(format!("Invalid email address: {}", mask_email(to)))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| InfrastructureError::Email(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, InfrastructureError> {
        let masked = mask_email(to);
        let message = self.build_message(to, subject, body)?;

        debug!("Sending email to {} via SMTP", masked);

        match self.transport.send(message).await {
            Ok(response) => {
                let message_id = response.message().collect::<Vec<_>>().join(" ");
                info!(
                    target: "email_service",
                    provider = "smtp",
                    to = %masked,
                    response = %message_id,
                    "Email sent successfully"
                );
                Ok(message_id)
            }
            Err(e) => {
                error!("SMTP send to {} failed: {}", masked, e);
                Err(InfrastructureError::Email(format!("SMTP send failed: {}", e)))
            }
        }
    }

    fn provider_name(&self) -> &str {
        "SMTP"
    }

    async fn is_available(&self) -> bool {
        match self.transport.test_connection().await {
            Ok(available) => available,
            Err(e) => {
                error!("SMTP connection test failed: {}", e);
                false
            }
        }
    }
}
