//! Lookup key of a passcode record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The (identity, purpose) pair a passcode is stored under
///
/// At most one live record exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OtpKey {
    /// Recipient address
    pub identity: String,
    /// Caller-supplied tag such as "signup" or "reset"
    pub purpose: String,
}

impl OtpKey {
    pub fn new(identity: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            purpose: purpose.into(),
        }
    }
}

impl fmt::Display for OtpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.purpose, self.identity)
    }
}
