//! Key derivation for per-entry encryption keys.
//!
//! Every vault entry gets its own 256-bit AES key, derived from the master
//! password and the entry's 16-byte salt via PBKDF2-HMAC-SHA256. There is no
//! single master key that decrypts the whole vault.

use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::Zeroizing;

/// Salt length in bytes for per-entry key derivation.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count. Deliberately slow; callers must not run key
/// derivation on an interactive thread.
pub const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(65_536).unwrap();

/// Derive the AES-256 key for a single entry from the master password and the
/// entry's salt.
///
/// Deterministic: the same (password, salt) pair always yields the same key,
/// so a ciphertext written under a salt can be decrypted later by re-deriving.
/// The returned key is zeroized when dropped.
pub fn derive_entry_key(password: &str, salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    derive_with_iterations(password, salt, PBKDF2_ITERATIONS)
}

fn derive_with_iterations(
    password: &str,
    salt: &[u8],
    iterations: NonZeroU32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password.as_bytes(),
        key.as_mut(),
    );
    key
}
