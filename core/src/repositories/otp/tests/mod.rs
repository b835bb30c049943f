//! Tests for the OTP repository
