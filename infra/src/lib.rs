//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the OneTime service.
//! It provides concrete stores and notifiers for the passcode service
//! defined in `ot_core`, and wires them together from configuration.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL passcode store using SQLx
//! - **Cache**: Redis passcode store with native key expiry
//! - **Email**: SMTP delivery through lettre, plus a mock for development
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL store (default)
//! - `redis-cache`: Enable the Redis store (default)
//! - `smtp-email`: Enable SMTP delivery (default)

use std::sync::Arc;

use ot_core::repositories::{InMemoryOtpRepository, OtpRepository};
use ot_core::services::otp::{
    CodeGenerator, EmailServiceTrait, OsRngCodeGenerator, OtpService, OtpServiceConfig,
    ThreadRngCodeGenerator,
};
use ot_shared::config::{AppConfig, StoreBackend};

// Re-export core types for convenience
pub use ot_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and passcode store
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Email module - passcode delivery providers
pub mod email;

/// Configuration types used by infrastructure services
pub mod config {
    pub use ot_shared::config::{
        AppConfig, CacheConfig, DatabaseConfig, EmailConfig, EmailProvider, SmtpSecurity,
        StoreBackend,
    };
}

/// OTP service assembled from runtime-selected store and notifier
pub type DynOtpService = OtpService<dyn OtpRepository, dyn EmailServiceTrait>;

/// Build the OTP service described by `config`
///
/// This function sets up:
/// - The passcode store named by `otp.store`
/// - The email provider named by `email.provider`
/// - The code generator (`otp.use_os_rng`)
pub async fn initialize(config: &AppConfig) -> Result<DynOtpService, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        store = ?config.otp.store,
        email_provider = ?config.email.provider,
        "Initializing OTP service"
    );

    let service_config = OtpServiceConfig::try_from(&config.otp)
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    let repository = create_otp_repository(config).await?;
    let provider: Arc<dyn email::EmailService> =
        Arc::from(email::create_email_service(&config.email));
    let email_service: Arc<dyn EmailServiceTrait> =
        Arc::new(email::EmailServiceAdapter::new(provider));
    let generator: Arc<dyn CodeGenerator> = if config.otp.use_os_rng {
        Arc::new(OsRngCodeGenerator)
    } else {
        Arc::new(ThreadRngCodeGenerator)
    };

    tracing::info!("OTP service initialized successfully");

    Ok(OtpService::with_generator(
        repository,
        email_service,
        generator,
        service_config,
    ))
}

/// Create the passcode store selected by configuration
pub async fn create_otp_repository(
    config: &AppConfig,
) -> Result<Arc<dyn OtpRepository>, InfrastructureError> {
    match config.otp.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory OTP store; codes are lost on restart");
            Ok(Arc::new(InMemoryOtpRepository::new()))
        }
        #[cfg(feature = "mysql")]
        StoreBackend::Mysql => {
            let pool = database::DatabasePool::new(config.database.clone()).await?;
            if config.database.run_migrations {
                pool.run_migrations().await?;
            }
            Ok(Arc::new(database::MySqlOtpRepository::new(
                pool.get_pool().clone(),
            )))
        }
        #[cfg(feature = "redis-cache")]
        StoreBackend::Redis => {
            let client = cache::RedisClient::new(config.cache.clone()).await?;
            Ok(Arc::new(cache::RedisOtpRepository::new(client)))
        }
        #[allow(unreachable_patterns)]
        other => Err(InfrastructureError::Config(format!(
            "OTP store '{:?}' is not enabled in this build",
            other
        ))),
    }
}

/// Load application configuration
///
/// Reads `.env` if present, then layers defaults, the environment's
/// config file and `OTP__*` variables.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    AppConfig::load().map_err(|e| InfrastructureError::Config(e.to_string()))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Email delivery error
    #[error("Email service error: {0}")]
    Email(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(_) | InfrastructureError::Cache(_) => {
                DomainError::persistence(err.to_string())
            }
            InfrastructureError::Email(message) => DomainError::delivery(message),
            InfrastructureError::Config(_) => DomainError::Internal {
                message: err.to_string(),
            },
        }
    }
}
