//! Password strength estimation.
//!
//! A simple additive score over length and character-class diversity, mapped
//! to four user-facing levels. Intentionally heuristic - strength feedback,
//! not entropy measurement.

use std::fmt;

/// Password strength levels, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl Strength {
    /// Short advice string for display next to the level.
    pub fn advice(self) -> &'static str {
        match self {
            Strength::Weak => "min 8 chars, combine letters, numbers, symbols",
            Strength::Medium => "aim for more than 12 chars, add more types",
            Strength::Strong => "good balance of length and complexity",
            Strength::VeryStrong => "excellent security",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
            Strength::VeryStrong => "very strong",
        };
        f.write_str(label)
    }
}

/// Score a password and map it to a [`Strength`] level.
pub fn evaluate(password: &str) -> Strength {
    let mut score = 0u8;

    if password.len() >= 8 {
        score += 1;
    }
    if password.len() >= 12 {
        score += 1;
    }
    if password.len() >= 16 {
        score += 1;
    }

    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let classes = [has_uppercase, has_lowercase, has_digit, has_symbol];
    score += classes.iter().filter(|&&present| present).count() as u8;

    let distinct = classes.iter().filter(|&&present| present).count();
    if distinct >= 3 {
        score += 1;
    }
    if distinct >= 4 {
        score += 1;
    }

    match score {
        0..=3 => Strength::Weak,
        4..=5 => Strength::Medium,
        6..=7 => Strength::Strong,
        _ => Strength::VeryStrong,
    }
}
