//! Domain entities representing core business objects.

pub mod otp_record;

// Re-export commonly used types
pub use otp_record::{OtpRecord, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_CODE_LENGTH};
