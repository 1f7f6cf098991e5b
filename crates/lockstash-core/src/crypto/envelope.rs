//! Authenticated encryption of a single secret field.
//!
//! Each secret string (an entry's password or notes) is encrypted on its own
//! under a key derived from the master password and the entry's salt. The
//! resulting envelope is `Base64(nonce ‖ ciphertext ‖ tag)`; the salt is NOT
//! part of the envelope and must be stored by the caller alongside it. Both
//! pieces are needed to decrypt.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{instrument, warn};

use super::CryptoError;
use super::kdf::{self, SALT_LEN};
use super::random::{self, NONCE_LEN};

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt a secret string under the master password and the entry's salt.
///
/// A fresh nonce is generated per call, so encrypting the same plaintext twice
/// yields different envelopes. Neither the plaintext nor the derived key is
/// ever logged.
#[instrument(level = "debug", skip_all)]
pub fn encrypt(
    plaintext: &str,
    password: &str,
    salt: &[u8; SALT_LEN],
) -> Result<String, CryptoError> {
    let key = kdf::derive_entry_key(password, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_ref()));

    let nonce = random::generate_nonce();
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(combined))
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// The caller must supply the same salt that was used at encryption time.
/// Fails with [`CryptoError::Authentication`] when the tag does not verify -
/// wrong password, wrong salt, and tampered ciphertext are indistinguishable
/// by design. No partial plaintext is ever returned on failure.
#[instrument(level = "debug", skip_all, fields(envelope_len = envelope.len()))]
pub fn decrypt(
    envelope: &str,
    password: &str,
    salt: &[u8; SALT_LEN],
) -> Result<String, CryptoError> {
    let combined = BASE64
        .decode(envelope.trim())
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid base64: {e}")))?;

    if combined.len() < NONCE_LEN + TAG_LEN {
        return Err(CryptoError::MalformedEnvelope(format!(
            "expected at least {} bytes, got {}",
            NONCE_LEN + TAG_LEN,
            combined.len()
        )));
    }

    let (nonce, ciphertext) = combined.split_at(NONCE_LEN);

    let key = kdf::derive_entry_key(password, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_ref()));

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            warn!("envelope decryption failed - authentication tag mismatch");
            CryptoError::Authentication
        })?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::MalformedEnvelope("decrypted payload is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random::generate_salt;
    use proptest::prelude::*;

    const PASSWORD: &str = "Tr0ub4dor&3";

    #[test]
    fn test_round_trip() {
        let salt = generate_salt();
        let envelope = encrypt("correct horse battery staple", PASSWORD, &salt).unwrap();
        let plaintext = decrypt(&envelope, PASSWORD, &salt).unwrap();
        assert_eq!(plaintext, "correct horse battery staple");
    }

    #[test]
    fn test_round_trip_empty_string() {
        let salt = generate_salt();
        let envelope = encrypt("", PASSWORD, &salt).unwrap();
        assert_eq!(decrypt(&envelope, PASSWORD, &salt).unwrap(), "");
    }

    #[test]
    fn test_round_trip_unicode() {
        let salt = generate_salt();
        let secret = "pässwörd-🔐-特殊文字";
        let envelope = encrypt(secret, PASSWORD, &salt).unwrap();
        assert_eq!(decrypt(&envelope, PASSWORD, &salt).unwrap(), secret);
    }

    #[test]
    fn test_round_trip_large_plaintext() {
        let salt = generate_salt();
        let secret = "note ".repeat(1024); // > 4 KiB
        let envelope = encrypt(&secret, PASSWORD, &salt).unwrap();
        assert_eq!(decrypt(&envelope, PASSWORD, &salt).unwrap(), secret);
    }

    #[test]
    fn test_nonce_freshness() {
        let salt = generate_salt();
        let a = encrypt("same plaintext", PASSWORD, &salt).unwrap();
        let b = encrypt("same plaintext", PASSWORD, &salt).unwrap();
        assert_ne!(a, b, "two encryptions must use different nonces");
        assert_eq!(decrypt(&a, PASSWORD, &salt).unwrap(), "same plaintext");
        assert_eq!(decrypt(&b, PASSWORD, &salt).unwrap(), "same plaintext");
    }

    #[test]
    fn test_salt_independence() {
        let s1 = [1u8; SALT_LEN];
        let s2 = [2u8; SALT_LEN];
        let a = encrypt("shared secret", PASSWORD, &s1).unwrap();
        let b = encrypt("shared secret", PASSWORD, &s2).unwrap();
        assert_ne!(a, b);
        // An envelope written under one salt must not open under another.
        assert!(matches!(
            decrypt(&a, PASSWORD, &s2),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let salt = generate_salt();
        let envelope = encrypt("secret", PASSWORD, &salt).unwrap();
        assert!(matches!(
            decrypt(&envelope, "wrong-password", &salt),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_tamper_detection_every_byte() {
        let salt = generate_salt();
        let envelope = encrypt("tamper target", PASSWORD, &salt).unwrap();
        let raw = BASE64.decode(&envelope).unwrap();

        for position in 0..raw.len() {
            let mut corrupted = raw.clone();
            corrupted[position] ^= 0x01;
            let result = decrypt(&BASE64.encode(&corrupted), PASSWORD, &salt);
            assert!(
                matches!(result, Err(CryptoError::Authentication)),
                "flipping byte {position} must fail authentication"
            );
        }
    }

    #[test]
    fn test_malformed_envelope_not_base64() {
        let salt = generate_salt();
        assert!(matches!(
            decrypt("not!!valid//base64===", PASSWORD, &salt),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_malformed_envelope_too_short() {
        let salt = generate_salt();
        let short = BASE64.encode([0u8; NONCE_LEN + TAG_LEN - 1]);
        assert!(matches!(
            decrypt(&short, PASSWORD, &salt),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip(plaintext in ".{0,512}", password in ".{1,64}") {
            let salt = generate_salt();
            let envelope = encrypt(&plaintext, &password, &salt).unwrap();
            prop_assert_eq!(decrypt(&envelope, &password, &salt).unwrap(), plaintext);
        }

        #[test]
        fn prop_wrong_password_never_decrypts(
            plaintext in ".{0,128}",
            password in "[a-z]{8,32}",
            other in "[A-Z]{8,32}",
        ) {
            let salt = generate_salt();
            let envelope = encrypt(&plaintext, &password, &salt).unwrap();
            prop_assert!(matches!(
                decrypt(&envelope, &other, &salt),
                Err(CryptoError::Authentication)
            ));
        }
    }
}
