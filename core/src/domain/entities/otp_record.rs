//! Passcode record entity for email-based one-time passcodes.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::OtpKey;

/// Length of the passcode
pub const CODE_LENGTH: usize = 6;

/// Widest code whose numeric range still fits in a `u64`
pub const MAX_CODE_LENGTH: usize = 18;

/// Default expiration time for passcodes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// A stored one-time passcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier of this record
    pub id: Uuid,

    /// Recipient address the code was sent to
    pub identity: String,

    /// What the code authorizes ("signup", "reset", ...)
    pub purpose: String,

    /// Zero-padded numeric code
    pub code: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the code is rejected
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a record issued now that lives for `ttl`
    pub fn new(
        identity: impl Into<String>,
        purpose: impl Into<String>,
        code: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self::issued_at(identity, purpose, code, Utc::now(), ttl)
    }

    /// Creates a record with an explicit issue instant
    pub fn issued_at(
        identity: impl Into<String>,
        purpose: impl Into<String>,
        code: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity: identity.into(),
            purpose: purpose.into(),
            code: code.into(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// The (identity, purpose) key this record is stored under
    pub fn key(&self) -> OtpKey {
        OtpKey::new(self.identity.clone(), self.purpose.clone())
    }

    /// Whether the code had expired at `now`
    ///
    /// The expiry instant itself is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether the code has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Exact comparison against a submitted code
    ///
    /// No trimming or normalization is applied. Equal-length inputs are
    /// compared in constant time.
    pub fn matches(&self, code: &str) -> bool {
        self.code.len() == code.len() && constant_time_eq(self.code.as_bytes(), code.as_bytes())
    }

    /// Time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
