//! Email Service Interface
//!
//! Defines the trait for email provider implementations that deliver
//! passcodes and other plain-text messages.

use async_trait::async_trait;

use crate::InfrastructureError;

/// Email service trait for sending messages
///
/// Implementations include:
/// - SMTP relay through lettre
/// - Mock implementation for development
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send a plain-text email
    ///
    /// # Arguments
    ///
    /// * `to` - Recipient address
    /// * `subject` - Subject line
    /// * `body` - Plain-text body
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the accepted message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, InfrastructureError>;

    /// Get the service provider name ("SMTP", "Mock")
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    ///
    /// Default implementation always returns true.
    async fn is_available(&self) -> bool {
        true
    }
}
