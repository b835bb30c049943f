//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    CodeGenerator, EmailServiceTrait, KeyedMutex, OsRngCodeGenerator, OtpService,
    OtpServiceConfig, ThreadRngCodeGenerator,
};
