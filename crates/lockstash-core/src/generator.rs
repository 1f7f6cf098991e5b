//! Random password generation.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_-+=<>?/{}[]|";

/// Minimum accepted password length.
pub const MIN_LENGTH: usize = 8;

/// Default generated password length.
pub const DEFAULT_LENGTH: usize = 16;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("password length must be at least {MIN_LENGTH} characters, got {0}")]
    TooShort(usize),
}

/// Generate a random password of `length` characters.
///
/// Guarantees at least one lowercase letter, one uppercase letter, one digit
/// and one symbol, then fills the rest from the combined alphabet and
/// shuffles so the guaranteed characters don't sit at fixed positions. Uses
/// the same CSPRNG as salt/nonce generation.
pub fn generate(length: usize) -> Result<String, GeneratorError> {
    if length < MIN_LENGTH {
        return Err(GeneratorError::TooShort(length));
    }

    let all: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS].concat();
    let mut rng = rand::rng();
    let mut password = Vec::with_capacity(length);

    for set in [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS] {
        password.push(set[rng.random_range(0..set.len())]);
    }
    while password.len() < length {
        password.push(all[rng.random_range(0..all.len())]);
    }
    password.shuffle(&mut rng);

    // The alphabet is pure ASCII.
    Ok(String::from_utf8_lossy(&password).into_owned())
}
