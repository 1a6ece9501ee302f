// src/generators/mod.rs
pub mod password;
pub mod strength;

pub use password::{generate, EntropySource, GeneratedPassword, GeneratorError, PasswordGenerator};
pub use strength::{classify_strength, is_weak, Strength};
