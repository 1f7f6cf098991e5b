//! The persisted master-password record and unlock preferences.
//!
//! One record per vault: the one-way hash of the master password (never the
//! plaintext) plus the biometric-unlock flag. The record is replaced
//! wholesale on password reset, never partially updated. Tamper resistance
//! at rest is the deployment's concern - the original host kept this in a
//! keystore-encrypted preference file; here it is a plain settings file
//! whose protection is delegated to the filesystem.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::store::StoreError;

/// Persisted vault-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Base64 SHA-256 digest of the master password; `None` until first setup.
    pub master_password_hash: Option<String>,
    /// Whether biometric unlock is offered at login.
    #[serde(default)]
    pub biometric_enabled: bool,
}

/// Storage boundary for [`VaultSettings`].
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<VaultSettings, StoreError>;

    /// Replace the whole record.
    fn save(&self, settings: &VaultSettings) -> Result<(), StoreError>;
}

/// In-memory settings for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<VaultSettings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<VaultSettings, StoreError> {
        Ok(lock(&self.settings).clone())
    }

    fn save(&self, settings: &VaultSettings) -> Result<(), StoreError> {
        *lock(&self.settings) = settings.clone();
        Ok(())
    }
}

/// Single-file JSON settings store.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<VaultSettings, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(VaultSettings::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, settings: &VaultSettings) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(settings)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
