//! Value objects without identity of their own.

pub mod otp_key;

pub use otp_key::OtpKey;
