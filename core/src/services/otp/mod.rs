//! One-time passcode service module
//!
//! This module provides the passcode workflow:
//! - Code generation from a pluggable random source
//! - Storage with a fixed lifetime, one record per (identity, purpose)
//! - Delivery of the code by email
//! - Single-use validation
//! - Per-key serialization of store updates

mod config;
mod generator;
mod key_lock;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use generator::{CodeGenerator, OsRngCodeGenerator, ThreadRngCodeGenerator};
pub use key_lock::{KeyGuard, KeyedMutex};
pub use service::OtpService;
pub use traits::EmailServiceTrait;
