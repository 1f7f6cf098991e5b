//! Biometric unlock boundary.
//!
//! Biometric hardware is an external collaborator: it produces an outcome
//! event, nothing more. A biometric success on its own does not yield the
//! master password, and entry decryption is impossible without it - so the
//! session may only be populated through a [`SealedPasswordProvider`] that
//! releases the real master password (for example, one sealed behind a
//! platform keystore gated by the same biometric). Substituting a placeholder
//! value would make every later decryption fail; this module refuses to.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::Session;

/// Result of a biometric prompt, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometricOutcome {
    /// The user authenticated successfully.
    Success,
    /// The user failed to authenticate (bad fingerprint, cancelled).
    Failure,
    /// The prompt errored out with a platform-specific reason.
    Error(String),
    /// No usable biometric hardware is present or enrolled.
    HardwareUnavailable,
}

/// Releases the real master password after a biometric success.
///
/// Implementations are expected to hold the password sealed at rest (e.g.
/// wrapped by a biometric-gated platform key) and only release it when the
/// hardware has vouched for the user. Returning `None` means no sealed
/// password exists and the user must log in with the password itself.
pub trait SealedPasswordProvider: Send + Sync {
    fn release(&self) -> Option<SecretString>;
}

/// Errors from completing a biometric unlock.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BiometricUnlockError {
    /// The biometric prompt did not end in success.
    #[error("biometric authentication did not succeed: {0}")]
    NotAuthenticated(String),

    /// Authentication succeeded but no sealed master password is available,
    /// so the session cannot be populated. Password login is required.
    #[error("no sealed master password available - password login required")]
    NoSealedPassword,
}

/// Populate `session` from a biometric outcome.
///
/// Only a [`BiometricOutcome::Success`] paired with a provider that releases
/// a password unlocks the session; every other combination leaves the session
/// untouched and returns a typed error.
pub fn complete_biometric_unlock(
    session: &Session,
    outcome: &BiometricOutcome,
    provider: Option<&dyn SealedPasswordProvider>,
) -> Result<(), BiometricUnlockError> {
    match outcome {
        BiometricOutcome::Success => {
            let released = provider.and_then(SealedPasswordProvider::release);
            match released {
                Some(password) => {
                    session.unlock(password.expose_secret());
                    Ok(())
                }
                None => Err(BiometricUnlockError::NoSealedPassword),
            }
        }
        BiometricOutcome::Failure => Err(BiometricUnlockError::NotAuthenticated(
            "authentication failed".into(),
        )),
        BiometricOutcome::Error(reason) => {
            Err(BiometricUnlockError::NotAuthenticated(reason.clone()))
        }
        BiometricOutcome::HardwareUnavailable => Err(BiometricUnlockError::NotAuthenticated(
            "biometric hardware unavailable".into(),
        )),
    }
}
