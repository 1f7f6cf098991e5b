//! Cryptographically secure salt and nonce generation.

use rand::RngCore;

use super::kdf::SALT_LEN;

/// Nonce length in bytes for AES-GCM (96 bits).
pub const NONCE_LEN: usize = 12;

/// Generate a fresh 16-byte salt for per-entry key derivation.
///
/// Every entry creation (and every rewrite of an entry's secret fields) must
/// call this; salts are never reused across entries or re-encryptions.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Generate a fresh 12-byte nonce for a single AES-GCM encryption.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salts_are_independent() {
        let salts: Vec<_> = (0..32).map(|_| generate_salt()).collect();
        for (i, a) in salts.iter().enumerate() {
            for b in &salts[i + 1..] {
                assert_ne!(a, b, "two generated salts collided");
            }
        }
    }

    #[test]
    fn test_nonces_are_independent() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_ne!(a, b);
    }
}
