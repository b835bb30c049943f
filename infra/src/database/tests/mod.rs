//! Tests for the database module

#[cfg(test)]
mod connection_tests;
