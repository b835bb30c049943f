//! Email delivery configuration module

use serde::{Deserialize, Serialize};

/// Which email provider delivers passcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// Log messages instead of sending them
    Mock,
    /// Send through an SMTP relay
    Smtp,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" | "console" => Ok(EmailProvider::Mock),
            "smtp" => Ok(EmailProvider::Smtp),
            _ => Err(format!("Invalid email provider: {}", s)),
        }
    }
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS (usually port 465)
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    Starttls,
    /// Unencrypted, for local relays such as MailHog
    None,
}

/// Email provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Email provider
    pub provider: EmailProvider,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP relay port
    pub smtp_port: u16,

    /// Connection security
    #[serde(default = "default_security")]
    pub security: SmtpSecurity,

    /// SMTP username
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub password: Option<String>,

    /// Sender mailbox, e.g. `OneTime <no-reply@example.com>`
    pub from_address: String,

    /// SMTP command timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::Mock,
            smtp_host: String::from("localhost"),
            smtp_port: 587,
            security: default_security(),
            username: None,
            password: None,
            from_address: String::from("no-reply@localhost"),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let provider = std::env::var("EMAIL_PROVIDER")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.provider);
        let security = match std::env::var("SMTP_SECURITY").as_deref() {
            Ok("tls") => SmtpSecurity::Tls,
            Ok("none") => SmtpSecurity::None,
            _ => defaults.security,
        };

        Self {
            provider,
            smtp_host: std::env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.smtp_port),
            security,
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("SMTP_FROM").unwrap_or(defaults.from_address),
            timeout_secs: defaults.timeout_secs,
        }
    }

    /// Whether both username and password are set
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

fn default_security() -> SmtpSecurity {
    SmtpSecurity::Starttls
}

fn default_timeout_secs() -> u64 {
    30
}
