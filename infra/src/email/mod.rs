//! Email Service Module
//!
//! This module provides email delivery for passcodes.
//!
//! ## Features
//!
//! - **Email Service Trait**: Common interface for all email providers
//! - **Mock Implementation**: Console output and an in-memory outbox
//! - **SMTP Support**: Delivery through any SMTP relay (feature `smtp-email`)
//! - **Security**: Recipient addresses are masked in logs

pub mod email_service;
pub mod mock_email;
pub mod trait_adapter;

#[cfg(feature = "smtp-email")]
pub mod smtp;

// Re-export commonly used types
pub use email_service::EmailService;
pub use mock_email::{MockEmailService, OutboxMessage};
pub use trait_adapter::EmailServiceAdapter;

#[cfg(feature = "smtp-email")]
pub use smtp::SmtpEmailService;

use crate::config::{EmailConfig, EmailProvider};

#[cfg(test)]
mod tests;

/// Create an email service based on configuration
///
/// Returns the provider named in the configuration. A provider that cannot
/// be built, or is not compiled in, falls back to the mock implementation.
pub fn create_email_service(config: &EmailConfig) -> Box<dyn EmailService> {
    match config.provider {
        EmailProvider::Mock => Box::new(MockEmailService::new()),
        #[cfg(feature = "smtp-email")]
        EmailProvider::Smtp => match SmtpEmailService::new(config) {
            Ok(service) => Box::new(service),
            Err(e) => {
                tracing::error!("Failed to initialize SMTP email service: {}", e);
                tracing::warn!("Falling back to mock email service");
                Box::new(MockEmailService::new())
            }
        },
        #[allow(unreachable_patterns)]
        other => {
            tracing::warn!(
                "Email provider '{:?}' is not enabled in this build, using mock implementation",
                other
            );
            Box::new(MockEmailService::new())
        }
    }
}
