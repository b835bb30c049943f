//! Configuration for the OTP service

use chrono::Duration;
use ot_shared::config::OtpConfig;

use crate::domain::entities::{CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_CODE_LENGTH};
use crate::errors::{DomainError, DomainResult};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of digits in a generated code
    pub code_length: usize,
    /// Number of minutes before a code expires
    pub code_expiration_minutes: i64,
    /// Subject line of the passcode email
    pub email_subject: String,
    /// Body of the passcode email; `{code}` and `{minutes}` are substituted
    pub email_body_template: String,
    /// Delete the stored code when its email cannot be delivered
    pub revoke_on_delivery_failure: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: CODE_LENGTH,
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            email_subject: "Your OTP".to_string(),
            email_body_template: "Your OTP is {code}".to_string(),
            revoke_on_delivery_failure: false,
        }
    }
}

impl OtpServiceConfig {
    /// Lifetime of a code
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.code_expiration_minutes)
    }

    /// Render the email body for a code
    pub fn render_body(&self, code: &str) -> String {
        self.email_body_template
            .replace("{code}", code)
            .replace("{minutes}", &self.code_expiration_minutes.to_string())
    }

    /// Reject settings the service cannot honour
    pub fn validate(&self) -> DomainResult<()> {
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(DomainError::Validation {
                message: format!(
                    "code length must be between 1 and {}, got {}",
                    MAX_CODE_LENGTH, self.code_length
                ),
            });
        }

        if self.code_expiration_minutes < 0 {
            return Err(DomainError::Validation {
                message: format!(
                    "code expiration must not be negative, got {} minutes",
                    self.code_expiration_minutes
                ),
            });
        }

        if !self.email_body_template.contains("{code}") {
            return Err(DomainError::Validation {
                message: "email body template must contain {code}".to_string(),
            });
        }

        Ok(())
    }
}

impl TryFrom<&OtpConfig> for OtpServiceConfig {
    type Error = DomainError;

    fn try_from(config: &OtpConfig) -> Result<Self, Self::Error> {
        let service_config = Self {
            code_length: config.code_length,
            code_expiration_minutes: config.expiration_minutes,
            email_subject: config.email_subject.clone(),
            email_body_template: config.email_body.clone(),
            revoke_on_delivery_failure: config.revoke_on_delivery_failure,
        };
        service_config.validate()?;
        Ok(service_config)
    }
}
