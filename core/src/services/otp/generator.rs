//! Passcode generators

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::MAX_CODE_LENGTH;

/// Source of numeric passcodes
///
/// Implementations return exactly `length` ASCII digits drawn uniformly
/// from `0..10^length`, zero-padded on the left. Lengths outside
/// `1..=MAX_CODE_LENGTH` are clamped.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

/// Draws codes from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngCodeGenerator;

impl CodeGenerator for ThreadRngCodeGenerator {
    fn generate(&self, length: usize) -> String {
        draw(&mut rand::thread_rng(), length)
    }
}

/// Draws codes from the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngCodeGenerator;

impl CodeGenerator for OsRngCodeGenerator {
    fn generate(&self, length: usize) -> String {
        draw(&mut OsRng, length)
    }
}

// gen_range rejects out-of-zone samples, so there is no modulo bias
fn draw<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let width = length.clamp(1, MAX_CODE_LENGTH);
    let upper = 10u64.pow(width as u32);
    let value = rng.gen_range(0..upper);
    format!("{:0width$}", value, width = width)
}
