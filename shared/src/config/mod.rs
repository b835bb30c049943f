//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis connection used by the Redis OTP store
//! - `database` - Database connection and pool configuration
//! - `email` - Email provider and SMTP settings
//! - `environment` - Environment detection and logging configuration
//! - `otp` - Passcode width, lifetime, message and store selection

pub mod cache;
pub mod database;
pub mod email;
pub mod environment;
pub mod otp;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use email::{EmailConfig, EmailProvider, SmtpSecurity};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{OtpConfig, StoreBackend};

/// Prefix for environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "OTP";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Email delivery configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Passcode configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/onetime_dev"),
            cache: CacheConfig::default(),
            email: EmailConfig::default(),
            otp: OtpConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::new("mysql://prod-db:3306/onetime").with_max_connections(50),
            cache: CacheConfig::default(),
            email: EmailConfig {
                provider: EmailProvider::Smtp,
                ..EmailConfig::default()
            },
            otp: OtpConfig {
                store: StoreBackend::Mysql,
                ..OtpConfig::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Defaults for the given environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration from plain environment variables
    ///
    /// Reads `APP_ENV`, `DATABASE_URL`, `REDIS_URL`, `SMTP_*` and `OTP_*`
    /// on top of the environment defaults.
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let defaults = Self::for_environment(env);

        Self {
            environment: env,
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            email: EmailConfig::from_env(),
            otp: OtpConfig::from_env(),
            logging: defaults.logging,
        }
    }

    /// Load layered configuration
    ///
    /// Sources, lowest precedence first:
    /// 1. the defaults for the environment named by `APP_ENV`
    /// 2. an optional `config.<env>.toml` file in the working directory
    /// 3. `OTP__<SECTION>__<FIELD>` environment variables
    ///    (e.g. `OTP__OTP__CODE_LENGTH=8`, `OTP__EMAIL__SMTP_HOST=mail.local`)
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = Environment::from_env();
        Self::load_layered(env, env.config_file())
    }

    /// Load layered configuration from an explicit file path
    pub fn load_layered(env: Environment, file: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Self::for_environment(env))?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
