// src/generators/strength.rs
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    /// No password entered.
    Empty,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Strength {
    pub fn label(&self) -> &'static str {
        match self {
            Strength::Empty => "-",
            Strength::Weak => "Weak",
            Strength::Moderate => "Moderate",
            Strength::Strong => "Strong",
            Strength::VeryStrong => "Very Strong",
        }
    }

    fn from_score(score: u8) -> Self {
        match score {
            0..=2 => Strength::Weak,
            3..=4 => Strength::Moderate,
            5..=6 => Strength::Strong,
            _ => Strength::VeryStrong,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn has_uppercase(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
}

fn has_lowercase(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
}

fn has_digit(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_digit())
}

fn has_symbol(password: &str) -> bool {
    password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Six-point score: up to 2 for length, 1 per character class present.
pub fn strength_score(password: &str) -> u8 {
    let length = password.chars().count();
    let mut score = if length >= 12 {
        2
    } else if length >= 8 {
        1
    } else {
        0
    };

    for present in [
        has_uppercase(password),
        has_lowercase(password),
        has_digit(password),
        has_symbol(password),
    ] {
        if present {
            score += 1;
        }
    }

    score
}

pub fn classify_strength(password: &str) -> Strength {
    if password.is_empty() {
        return Strength::Empty;
    }
    Strength::from_score(strength_score(password))
}

/// Dashboard rule: failing any one of the four checks makes a password weak.
/// Lowercase letters are not required here.
pub fn is_weak(password: &str) -> bool {
    password.chars().count() < 8
        || !has_uppercase(password)
        || !has_digit(password)
        || !has_symbol(password)
}
