//! Core library for the lockstash password vault: per-entry authenticated
//! encryption, master-password verification, session handling and the
//! persistence boundaries around them.

pub mod breach;
pub mod crypto;
pub mod generator;
pub mod session;
pub mod strength;
pub mod vault;

pub use crypto::CryptoError;
pub use session::{Session, SessionError};
pub use vault::{Vault, VaultOperationError};

#[cfg(feature = "async")]
pub use vault::VaultAsync;
