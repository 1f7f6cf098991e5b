//! Exit codes for scripting against the CLI.

pub const SUCCESS: u8 = 0;
pub const GENERAL_ERROR: u8 = 1;
/// Master password rejected at login.
pub const AUTH_FAILED: u8 = 2;
/// Entry, vault path or file not found.
pub const NOT_FOUND: u8 = 3;
/// An envelope could not be decrypted (wrong password or corrupted data).
pub const DECRYPT_FAILED: u8 = 4;
/// Operation needed a live session but the vault is locked.
pub const VAULT_LOCKED: u8 = 5;
/// The vault has no master password record yet.
pub const NOT_INITIALIZED: u8 = 6;
/// Filesystem permission error on the vault directory.
pub const PERMISSION_DENIED: u8 = 7;
