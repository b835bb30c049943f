//! Traits for notifier integration

use async_trait::async_trait;

/// Trait for email delivery integration
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send a plain-text email
    ///
    /// Returns the provider's message id on success and a provider error
    /// message on failure.
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, String>;
}
