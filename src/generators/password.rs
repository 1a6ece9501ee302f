// src/generators/password.rs
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::{Distribution, Uniform};
use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, RngCore, SeedableRng};
use thiserror::Error;

use super::strength::{self, Strength};
use crate::models::PasswordGenerationOptions;

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Select at least one character type")]
    NoCharacterClass,

    #[error("Password length must be at least 1")]
    InvalidLength,
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Where the randomness behind a generated password came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropySource {
    /// Operating system CSPRNG.
    Secure,
    /// Time-seeded, non-cryptographic generator used when the OS source failed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPassword {
    pub value: String,
    pub source: EntropySource,
}

impl GeneratedPassword {
    pub fn is_secure(&self) -> bool {
        self.source == EntropySource::Secure
    }
}

pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        PasswordGenerator
    }

    pub fn generate_password(&self, options: &PasswordGenerationOptions) -> Result<GeneratedPassword> {
        generate(options)
    }

    pub fn analyze_password_strength(&self, password: &str) -> Strength {
        strength::classify_strength(password)
    }
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Union of the enabled alphabets, in upper/lower/digit/symbol order.
pub fn charset(options: &PasswordGenerationOptions) -> Vec<char> {
    let mut chars = Vec::new();

    if options.include_uppercase {
        chars.extend(UPPERCASE.chars());
    }
    if options.include_lowercase {
        chars.extend(LOWERCASE.chars());
    }
    if options.include_numbers {
        chars.extend(NUMBERS.chars());
    }
    if options.include_symbols {
        chars.extend(SYMBOLS.chars());
    }

    chars
}

// Generate a random password, preferring the OS entropy source
pub fn generate(options: &PasswordGenerationOptions) -> Result<GeneratedPassword> {
    let mut probe = [0u8; 8];
    match OsRng.try_fill_bytes(&mut probe) {
        Ok(()) => generate_with(options, &mut OsRng, EntropySource::Secure),
        Err(e) => {
            log::warn!("OS random source unavailable ({}), using non-cryptographic fallback", e);
            let seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            let mut rng = SmallRng::seed_from_u64(seed);
            generate_with(options, &mut rng, EntropySource::Fallback)
        }
    }
}

pub(crate) fn generate_with<R: Rng + ?Sized>(
    options: &PasswordGenerationOptions,
    rng: &mut R,
    source: EntropySource,
) -> Result<GeneratedPassword> {
    let chars = charset(options);
    if chars.is_empty() {
        return Err(GeneratorError::NoCharacterClass);
    }
    if options.length == 0 {
        return Err(GeneratorError::InvalidLength);
    }

    let dist = Uniform::from(0..chars.len());
    let value: String = (0..options.length)
        .map(|_| chars[dist.sample(&mut *rng)])
        .collect();

    Ok(GeneratedPassword { value, source })
}
