//! Main OTP service implementation

use chrono::Utc;
use std::sync::Arc;

use ot_shared::email::mask_email;

use crate::domain::entities::OtpRecord;
use crate::domain::value_objects::OtpKey;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::OtpRepository;

use super::config::OtpServiceConfig;
use super::generator::{CodeGenerator, ThreadRngCodeGenerator};
use super::key_lock::KeyedMutex;
use super::traits::EmailServiceTrait;

/// Service issuing, delivering and checking one-time passcodes
pub struct OtpService<R, E>
where
    R: OtpRepository + ?Sized,
    E: EmailServiceTrait + ?Sized,
{
    /// Passcode store
    repository: Arc<R>,
    /// Email notifier
    email_service: Arc<E>,
    /// Random source for codes
    generator: Arc<dyn CodeGenerator>,
    /// Serializes store updates per (identity, purpose)
    key_locks: KeyedMutex<OtpKey>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<R, E> OtpService<R, E>
where
    R: OtpRepository + ?Sized,
    E: EmailServiceTrait + ?Sized,
{
    /// Create a new OTP service drawing codes from the thread-local RNG
    ///
    /// # Arguments
    ///
    /// * `repository` - Passcode store implementation
    /// * `email_service` - Email notifier implementation
    /// * `config` - Service configuration
    pub fn new(repository: Arc<R>, email_service: Arc<E>, config: OtpServiceConfig) -> Self {
        Self::with_generator(
            repository,
            email_service,
            Arc::new(ThreadRngCodeGenerator),
            config,
        )
    }

    /// Create a new OTP service with an explicit code generator
    pub fn with_generator(
        repository: Arc<R>,
        email_service: Arc<E>,
        generator: Arc<dyn CodeGenerator>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            repository,
            email_service,
            generator,
            key_locks: KeyedMutex::new(),
            config,
        }
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Issue a fresh code for (identity, purpose) and email it
    ///
    /// This method:
    /// 1. Generates a new code
    /// 2. Removes any record already stored for the pair
    /// 3. Stores the new record with its expiry
    /// 4. Emails the code to the identity
    ///
    /// Steps 2 and 3 run under the pair's lock, so concurrent calls for the
    /// same pair leave exactly one record behind.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The code was stored and handed to the notifier
    /// * `Err(DomainError::Persistence)` - The store failed; nothing was sent
    /// * `Err(DomainError::Delivery)` - The code was stored but the email failed
    #[tracing::instrument(
        name = "otp.generate_and_send",
        skip(self, identity),
        fields(identity = %mask_email(identity))
    )]
    pub async fn generate_and_send(&self, identity: &str, purpose: &str) -> DomainResult<()> {
        let record = OtpRecord::new(identity, purpose, self.generate_code(), self.config.ttl());

        {
            let _guard = self.key_locks.lock(record.key()).await;
            self.remove_existing(identity, purpose).await?;
            self.repository.save(record.clone()).await?;
        }

        tracing::debug!(expires_at = %record.expires_at, "OTP stored");

        let body = self.config.render_body(&record.code);
        match self
            .email_service
            .send_email(identity, &self.config.email_subject, &body)
            .await
        {
            Ok(message_id) => {
                tracing::info!(
                    message_id = %message_id,
                    event = "otp_sent",
                    "OTP email sent"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to send OTP email"
                );

                if self.config.revoke_on_delivery_failure {
                    self.revoke(&record).await;
                }

                Err(DomainError::delivery(format!("Failed to send OTP email: {}", e)))
            }
        }
    }

    /// Check a submitted code for (identity, purpose)
    ///
    /// Any stored record is consumed by the attempt, whatever the outcome.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A live record existed and its code matched exactly
    /// * `Ok(false)` - No record, an expired record, or a wrong code
    /// * `Err(DomainError)` - The store failed
    #[tracing::instrument(
        name = "otp.validate",
        skip(self, identity, code),
        fields(identity = %mask_email(identity))
    )]
    pub async fn validate(&self, identity: &str, code: &str, purpose: &str) -> DomainResult<bool> {
        let _guard = self.key_locks.lock(OtpKey::new(identity, purpose)).await;

        let record = match self
            .repository
            .find_by_identity_and_purpose(identity, purpose)
            .await?
        {
            Some(record) => record,
            None => {
                tracing::debug!("No OTP on record");
                return Ok(false);
            }
        };

        let is_expired = record.is_expired_at(Utc::now());
        let is_match = record.matches(code);

        self.repository.delete(&record).await?;

        if is_expired || !is_match {
            tracing::warn!(
                is_expired = is_expired,
                is_match = is_match,
                event = "otp_rejected",
                "OTP validation failed"
            );
            return Ok(false);
        }

        tracing::info!(event = "otp_accepted", "OTP validated");
        Ok(true)
    }

    /// Remove the record for (identity, purpose), if any
    #[tracing::instrument(
        name = "otp.delete",
        skip(self, identity),
        fields(identity = %mask_email(identity))
    )]
    pub async fn delete_otp(&self, identity: &str, purpose: &str) -> DomainResult<()> {
        let _guard = self.key_locks.lock(OtpKey::new(identity, purpose)).await;
        self.remove_existing(identity, purpose).await
    }

    /// Draw a code of the configured length
    pub fn generate_code(&self) -> String {
        self.generator.generate(self.config.code_length)
    }

    // Caller must hold the pair's lock
    async fn remove_existing(&self, identity: &str, purpose: &str) -> DomainResult<()> {
        if let Some(existing) = self
            .repository
            .find_by_identity_and_purpose(identity, purpose)
            .await?
        {
            let deleted = self.repository.delete(&existing).await?;
            tracing::debug!(deleted = deleted, "Cleared previous OTP");
        }
        Ok(())
    }

    // Deletes by id, so a newer record issued meanwhile survives
    async fn revoke(&self, record: &OtpRecord) {
        let _guard = self.key_locks.lock(record.key()).await;

        match self.repository.delete(record).await {
            Ok(revoked) => tracing::warn!(revoked = revoked, "Revoked undelivered OTP"),
            Err(e) => tracing::error!(error = %e, "Failed to revoke undelivered OTP"),
        }
    }
}
