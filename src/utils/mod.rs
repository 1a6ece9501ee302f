// src/utils/mod.rs
mod format;

pub use format::*;
