//! Master-password verification for vault login.
//!
//! This is a separate scheme from entry encryption: login checks the master
//! password against a stored one-way digest, it never derives a decryption
//! key. The record format is an unsalted SHA-256 digest, Base64-encoded.
//! That format is deliberately preserved for compatibility with existing
//! records; its lack of a per-install salt is a known weakness, recorded in
//! DESIGN.md. The comparison here is constant-time.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use ring::digest;
use subtle::ConstantTimeEq;

/// Hash a master password for storage.
///
/// One-way: the plaintext master password is never persisted, only this
/// digest. The record is replaced wholesale on password reset.
pub fn hash(password: &str) -> String {
    let digest = digest::digest(&digest::SHA256, password.as_bytes());
    BASE64.encode(digest.as_ref())
}

/// Verify a master password attempt against a stored digest.
///
/// Never errors: an undecodable stored digest simply verifies false. The
/// digest comparison runs in constant time.
pub fn verify(password: &str, stored_digest: &str) -> bool {
    let Ok(stored) = BASE64.decode(stored_digest.trim()) else {
        return false;
    };
    let computed = digest::digest(&digest::SHA256, password.as_bytes());
    computed.as_ref().ct_eq(stored.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_correct_password() {
        let stored = hash("Tr0ub4dor&3");
        assert!(verify("Tr0ub4dor&3", &stored));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let stored = hash("Tr0ub4dor&3");
        assert!(!verify("wrong", &stored));
        assert!(!verify("tr0ub4dor&3", &stored));
        assert!(!verify("", &stored));
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash("a password"), hash("a password"));
        assert_ne!(hash("a password"), hash("another password"));
    }

    #[test]
    fn test_verify_rejects_undecodable_digest() {
        assert!(!verify("anything", "not valid base64!!!"));
        assert!(!verify("anything", ""));
    }

    #[test]
    fn test_digest_is_base64_of_sha256() {
        // SHA-256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(hash(""), "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
    }
}
