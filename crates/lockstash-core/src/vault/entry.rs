//! The persisted vault entry record.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use uuid::Uuid;

use crate::crypto::kdf::SALT_LEN;

/// One stored credential.
///
/// `service_name` and `username` stay plaintext for display and search; the
/// password and notes are stored as self-contained envelopes. `entry_salt` is
/// this entry's own key-derivation salt - it must travel with the envelopes,
/// which do not embed it, and is regenerated whenever the secret fields are
/// rewritten.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    pub id: Uuid,
    pub service_name: String,
    pub username: String,
    pub encrypted_password: String,
    pub encrypted_notes: Option<String>,
    #[serde_as(as = "Base64")]
    pub entry_salt: [u8; SALT_LEN],
    /// Unix seconds of the last create/update.
    pub last_updated: u64,
}

/// A decrypted view of one entry's secret fields.
///
/// The secrets are wrapped in [`SecretString`] so they are zeroized on drop
/// and redacted from `Debug` output.
#[derive(Debug)]
pub struct RevealedEntry {
    pub id: Uuid,
    pub service_name: String,
    pub username: String,
    pub password: SecretString,
    pub notes: Option<SecretString>,
}
