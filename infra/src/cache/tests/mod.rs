//! Tests for the cache module

#[cfg(test)]
mod redis_client_tests;
