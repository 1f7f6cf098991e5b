//! Cryptographic primitives for vault entry encryption

pub mod envelope;
pub mod kdf;
pub mod random;
pub mod verifier;

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
///
/// # Security Classification
///
/// Some errors indicate potential **adversarial tampering** or **integrity violations**.
/// These should be treated as security events and may warrant logging or aborting
/// the operation entirely.
///
/// Other errors indicate **user errors** (wrong master password) or **programming
/// errors** (invalid parameters). They are marked accordingly.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// AEAD tag verification failed during envelope decryption.
    ///
    /// This typically indicates a **wrong master password** was used. It can also
    /// occur when the wrong salt is supplied or the ciphertext has been tampered
    /// with or corrupted.
    ///
    /// Note: Cryptographically, wrong password, wrong salt, and tampering are
    /// indistinguishable because all three result in a failed authentication tag
    /// check. Callers must not attempt to tell them apart.
    #[error("decryption failed - wrong master password or corrupted/tampered data")]
    Authentication,

    /// The envelope string cannot be parsed at all.
    ///
    /// The payload is too short to contain a nonce and authentication tag, or is
    /// not valid Base64. No plaintext is recoverable; callers should treat this
    /// the same as [`CryptoError::Authentication`].
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Encryption failed unexpectedly.
    ///
    /// **[PROGRAMMING ERROR]** AES-GCM encryption of an in-memory string does not
    /// fail under normal operation.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Key derivation failed.
    ///
    /// **[PROGRAMMING ERROR]** PBKDF2 with a fixed, supported algorithm does not
    /// fail at runtime; this indicates a misconfigured build.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}
