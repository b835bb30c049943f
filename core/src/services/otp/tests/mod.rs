//! Tests for the OTP service module




#[cfg(test)]
mod service_tests;
