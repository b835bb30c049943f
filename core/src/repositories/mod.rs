//! Repository interfaces for persisting domain entities.

pub mod otp;

pub use otp::{InMemoryOtpRepository, OtpRepository};
