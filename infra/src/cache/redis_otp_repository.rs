//! Redis implementation of the OtpRepository trait
//!
//! Each record is stored as JSON under `otp:{len}:{purpose}:{identity}`
//! (plus the configured prefix), where `len` is the purpose's byte length,
//! with a TTL matching its expiry, so Redis drops expired codes on its own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ot_core::domain::entities::OtpRecord;
use ot_core::errors::DomainError;
use ot_core::repositories::OtpRepository;

use super::redis_client::RedisClient;

/// Redis-backed passcode store
#[derive(Clone)]
pub struct RedisOtpRepository {
    client: RedisClient,
}

impl RedisOtpRepository {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Full Redis key for an (identity, purpose) pair
    pub fn key_for(&self, identity: &str, purpose: &str) -> String {
        self.client.make_key(&record_key(identity, purpose))
    }
}

/// Unprefixed key for an (identity, purpose) pair
///
/// The length prefix keeps pairs distinct when either part contains `:`.
pub(crate) fn record_key(identity: &str, purpose: &str) -> String {
    format!("otp:{}:{}:{}", purpose.len(), purpose, identity)
}

/// Seconds a record should live in Redis, rounded up, at least one
pub(crate) fn ttl_seconds(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (expires_at - now).num_milliseconds();
    ((millis + 999) / 1000).max(1) as u64
}

/// Whether a stored record belongs to the requested pair
pub(crate) fn belongs_to(record: &OtpRecord, identity: &str, purpose: &str) -> bool {
    record.identity == identity && record.purpose == purpose
}

#[async_trait]
impl OtpRepository for RedisOtpRepository {
    async fn save(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let key = self.key_for(&record.identity, &record.purpose);
        let payload = serde_json::to_string(&record).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize OTP record: {}", e),
        })?;

        self.client
            .set_with_expiry(&key, &payload, ttl_seconds(record.expires_at, Utc::now()))
            .await?;

        Ok(record)
    }

    async fn find_by_identity_and_purpose(
        &self,
        identity: &str,
        purpose: &str,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let key = self.key_for(identity, purpose);

        match self.client.get(&key).await? {
            Some(payload) => {
                let record: OtpRecord =
                    serde_json::from_str(&payload).map_err(|e| DomainError::Internal {
                        message: format!("Failed to deserialize OTP record: {}", e),
                    })?;

                if belongs_to(&record, identity, purpose) {
                    Ok(Some(record))
                } else {
                    tracing::warn!(key = %key, "Stored OTP record does not match its key");
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, record: &OtpRecord) -> Result<bool, DomainError> {
        let key = self.key_for(&record.identity, &record.purpose);

        Ok(self
            .client
            .delete_if_id_matches(&key, &record.id.to_string())
            .await?)
    }
}
