//! Email Service Trait Adapter
//!
//! Bridges any infrastructure `EmailService` to the core
//! `EmailServiceTrait` the OTP service depends on.

use async_trait::async_trait;
use std::sync::Arc;

use ot_core::services::otp::EmailServiceTrait;

use super::email_service::EmailService;

/// Adapter that implements the core EmailServiceTrait for an email provider
pub struct EmailServiceAdapter<S: EmailService + ?Sized> {
    inner: Arc<S>,
}

impl<S: EmailService + ?Sized> EmailServiceAdapter<S> {
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// The wrapped provider
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

#[async_trait]
impl<S: EmailService + ?Sized> EmailServiceTrait for EmailServiceAdapter<S> {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, String> {
        self.inner
            .send_email(to, subject, body)
            .await
            .map_err(|e| e.to_string())
    }
}
