//! Shared utilities and common types for the OneTime workspace
//!
//! This crate provides functionality used across the core and infrastructure crates:
//! - Configuration types and layered loading
//! - Tracing subscriber initialisation
//! - Email address helpers (validation, masking for logs)

pub mod config;
pub mod telemetry;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, EmailConfig, EmailProvider, Environment, LogFormat,
    LoggingConfig, OtpConfig, SmtpSecurity, StoreBackend,
};
pub use utils::email;
