//! # OneTime Core
//!
//! Core business logic and domain layer for one-time passcodes.
//! This crate contains the passcode record entity, the issuing and
//! validating service, repository and notifier interfaces, and the
//! error types that the infrastructure layer builds on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::{InMemoryOtpRepository, OtpRepository};
pub use services::{
    CodeGenerator, EmailServiceTrait, KeyedMutex, OsRngCodeGenerator, OtpService,
    OtpServiceConfig, ThreadRngCodeGenerator,
};
