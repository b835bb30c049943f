//! Passcode configuration module

use serde::{Deserialize, Serialize};

/// Where passcode records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, lost on restart
    Memory,
    /// MySQL table with a unique (identity, purpose) key
    Mysql,
    /// One Redis key per (identity, purpose)
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mysql" => Ok(StoreBackend::Mysql),
            "redis" => Ok(StoreBackend::Redis),
            _ => Err(format!("Invalid OTP store backend: {}", s)),
        }
    }
}

/// Passcode issuance settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of digits in a code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Minutes a code stays valid
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,

    /// Subject line of the passcode email
    #[serde(default = "default_email_subject")]
    pub email_subject: String,

    /// Body of the passcode email; `{code}` and `{minutes}` are substituted
    #[serde(default = "default_email_body")]
    pub email_body: String,

    /// Delete a freshly stored code when its email cannot be sent
    #[serde(default)]
    pub revoke_on_delivery_failure: bool,

    /// Store backend
    #[serde(default = "default_store")]
    pub store: StoreBackend,

    /// Draw codes from the operating system RNG instead of the thread RNG
    #[serde(default)]
    pub use_os_rng: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            expiration_minutes: default_expiration_minutes(),
            email_subject: default_email_subject(),
            email_body: default_email_body(),
            revoke_on_delivery_failure: false,
            store: default_store(),
            use_os_rng: false,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            code_length: std::env::var("OTP_CODE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.code_length),
            expiration_minutes: std::env::var("OTP_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expiration_minutes),
            email_subject: std::env::var("OTP_EMAIL_SUBJECT").unwrap_or(defaults.email_subject),
            email_body: std::env::var("OTP_EMAIL_BODY").unwrap_or(defaults.email_body),
            revoke_on_delivery_failure: std::env::var("OTP_REVOKE_ON_DELIVERY_FAILURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.revoke_on_delivery_failure),
            store: std::env::var("OTP_STORE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store),
            use_os_rng: std::env::var("OTP_USE_OS_RNG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.use_os_rng),
        }
    }
}

fn default_code_length() -> usize {
    6
}

fn default_expiration_minutes() -> i64 {
    5
}

fn default_email_subject() -> String {
    String::from("Your OTP")
}

fn default_email_body() -> String {
    String::from("Your OTP is {code}")
}

fn default_store() -> StoreBackend {
    StoreBackend::Memory
}
