//! Cache module for Redis-backed passcode storage
//!
//! This module provides the Redis client, with connection retry and
//! backoff, and the passcode store built on top of it.

pub mod redis_client;
pub mod redis_otp_repository;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use redis_otp_repository::RedisOtpRepository;

// Re-export commonly used types
pub use ot_shared::config::CacheConfig;
