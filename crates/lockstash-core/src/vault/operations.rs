//! Vault operations: the authenticated flows over session, cipher and stores.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::crypto::{CryptoError, envelope, random, verifier};
use crate::session::{Session, SessionError};

use super::entry::{RevealedEntry, VaultEntry};
use super::settings::SettingsStore;
use super::store::{EntryStore, StoreError};

/// Errors that can occur during vault operations.
#[derive(Error, Debug)]
pub enum VaultOperationError {
    /// No master password has been set up yet.
    #[error("vault is not initialized - set a master password first")]
    NotInitialized,

    /// Setup was attempted on a vault that already has a master password.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// The supplied master password does not match the stored record.
    #[error("incorrect master password")]
    IncorrectPassword,

    /// No entry with the given id exists.
    #[error("entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A background worker running the operation failed.
    #[cfg(feature = "async")]
    #[error("background task failed: {0}")]
    Background(String),
}

/// Input for creating an entry.
pub struct NewEntry {
    pub service_name: String,
    pub username: String,
    pub password: SecretString,
    pub notes: Option<SecretString>,
}

/// Partial update of an existing entry.
///
/// `notes: Some(None)` clears the notes field; `None` leaves it unchanged.
#[derive(Default)]
pub struct EntryUpdate {
    pub service_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub notes: Option<Option<SecretString>>,
}

/// An unlocked-or-lockable vault over pluggable stores.
///
/// Construction wires together the entry store, the settings store and the
/// session; all secret-handling flows go through here. Every operation that
/// needs the master password takes it from the session via scoped access and
/// fails with [`SessionError::Expired`] when the session is locked.
pub struct Vault {
    entries: Box<dyn EntryStore>,
    settings: Box<dyn SettingsStore>,
    session: Arc<Session>,
}

impl Vault {
    pub fn new(
        entries: Box<dyn EntryStore>,
        settings: Box<dyn SettingsStore>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            entries,
            settings,
            session,
        }
    }

    /// The session this vault reads the master password from.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Whether a master password record exists.
    pub fn is_initialized(&self) -> Result<bool, VaultOperationError> {
        Ok(self.settings.load()?.master_password_hash.is_some())
    }

    /// First-run setup: store the master password record and unlock.
    #[instrument(level = "info", skip_all)]
    pub fn initialize(&self, master_password: &str) -> Result<(), VaultOperationError> {
        let mut settings = self.settings.load()?;
        if settings.master_password_hash.is_some() {
            return Err(VaultOperationError::AlreadyInitialized);
        }

        settings.master_password_hash = Some(verifier::hash(master_password));
        self.settings.save(&settings)?;
        self.session.unlock(master_password);
        info!("vault initialized");
        Ok(())
    }

    /// Verify the master password and unlock the session.
    ///
    /// On mismatch the session is left untouched.
    #[instrument(level = "info", skip_all)]
    pub fn login(&self, master_password: &str) -> Result<(), VaultOperationError> {
        let settings = self.settings.load()?;
        let stored = settings
            .master_password_hash
            .ok_or(VaultOperationError::NotInitialized)?;

        if !verifier::verify(master_password, &stored) {
            warn!("login rejected - master password mismatch");
            return Err(VaultOperationError::IncorrectPassword);
        }

        self.session.unlock(master_password);
        info!("vault unlocked");
        Ok(())
    }

    /// Clear the session password.
    pub fn lock(&self) {
        self.session.lock();
        info!("vault locked");
    }

    /// Whether biometric unlock is enabled for this vault.
    pub fn biometric_enabled(&self) -> Result<bool, VaultOperationError> {
        Ok(self.settings.load()?.biometric_enabled)
    }

    /// Toggle the biometric-unlock preference.
    pub fn set_biometric_enabled(&self, enabled: bool) -> Result<(), VaultOperationError> {
        let mut settings = self.settings.load()?;
        settings.biometric_enabled = enabled;
        self.settings.save(&settings)?;
        Ok(())
    }

    /// Encrypt and store a new entry under a freshly generated salt.
    #[instrument(level = "debug", skip_all, fields(service = %new.service_name))]
    pub fn add_entry(&self, new: NewEntry) -> Result<VaultEntry, VaultOperationError> {
        let salt = random::generate_salt();
        let entry = self.session.with_password(|master| {
            let encrypted_password =
                envelope::encrypt(new.password.expose_secret(), master, &salt)?;
            let encrypted_notes = new
                .notes
                .as_ref()
                .map(|notes| envelope::encrypt(notes.expose_secret(), master, &salt))
                .transpose()?;

            Ok::<_, CryptoError>(VaultEntry {
                id: Uuid::new_v4(),
                service_name: new.service_name.clone(),
                username: new.username.clone(),
                encrypted_password,
                encrypted_notes,
                entry_salt: salt,
                last_updated: unix_now(),
            })
        })??;

        self.entries.put(entry.clone())?;
        debug!(id = %entry.id, "entry added");
        Ok(entry)
    }

    /// Fetch one entry's metadata without decrypting anything.
    pub fn entry(&self, id: Uuid) -> Result<VaultEntry, VaultOperationError> {
        self.entries
            .get(id)?
            .ok_or(VaultOperationError::EntryNotFound(id))
    }

    /// All entries, metadata only, ordered by service name.
    pub fn entries(&self) -> Result<Vec<VaultEntry>, VaultOperationError> {
        Ok(self.entries.list_all()?)
    }

    /// Entries whose service name contains `query` (case-insensitive).
    pub fn find_by_service(&self, query: &str) -> Result<Vec<VaultEntry>, VaultOperationError> {
        let needle = query.to_lowercase();
        Ok(self
            .entries
            .list_all()?
            .into_iter()
            .filter(|e| e.service_name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Decrypt one entry's secret fields.
    #[instrument(level = "debug", skip(self))]
    pub fn reveal(&self, id: Uuid) -> Result<RevealedEntry, VaultOperationError> {
        let entry = self.entry(id)?;
        let revealed = self
            .session
            .with_password(|master| reveal_with(&entry, master))??;
        Ok(revealed)
    }

    /// Decrypt every entry, isolating failures per entry.
    ///
    /// One undecryptable entry (corrupted envelope, tampered store) must not
    /// hide the rest, so each entry carries its own result.
    pub fn reveal_all(
        &self,
    ) -> Result<Vec<(VaultEntry, Result<RevealedEntry, CryptoError>)>, VaultOperationError> {
        let entries = self.entries.list_all()?;
        let revealed = self.session.with_password(|master| {
            entries
                .into_iter()
                .map(|entry| {
                    let result = reveal_with(&entry, master);
                    (entry, result)
                })
                .collect()
        })?;
        Ok(revealed)
    }

    /// Rewrite an entry.
    ///
    /// The secret fields are always re-encrypted under a FRESH salt, even when
    /// only metadata changed - a salt never outlives one generation of the
    /// (password, notes) pair.
    #[instrument(level = "debug", skip(self, update))]
    pub fn update_entry(
        &self,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<VaultEntry, VaultOperationError> {
        let current = self.entry(id)?;
        let salt = random::generate_salt();

        let updated = self.session.with_password(|master| {
            let revealed = reveal_with(&current, master)?;

            let password = update.password.as_ref().unwrap_or(&revealed.password);
            let notes = match &update.notes {
                Some(replacement) => replacement.as_ref(),
                None => revealed.notes.as_ref(),
            };

            let encrypted_password = envelope::encrypt(password.expose_secret(), master, &salt)?;
            let encrypted_notes = notes
                .map(|n| envelope::encrypt(n.expose_secret(), master, &salt))
                .transpose()?;

            Ok::<_, CryptoError>(VaultEntry {
                id,
                service_name: update
                    .service_name
                    .clone()
                    .unwrap_or(current.service_name.clone()),
                username: update.username.clone().unwrap_or(current.username.clone()),
                encrypted_password,
                encrypted_notes,
                entry_salt: salt,
                last_updated: unix_now(),
            })
        })??;

        self.entries.put(updated.clone())?;
        debug!(id = %id, "entry updated");
        Ok(updated)
    }

    /// Remove an entry.
    pub fn delete_entry(&self, id: Uuid) -> Result<(), VaultOperationError> {
        self.entries.delete(id)?;
        debug!(id = %id, "entry deleted");
        Ok(())
    }

    /// Re-key the whole vault under a new master password.
    ///
    /// Verifies the current password, decrypts every entry, re-encrypts each
    /// under the new password with a fresh salt, then replaces the master
    /// record wholesale and swaps the session value. If any entry fails to
    /// decrypt the change is aborted before anything is written.
    #[instrument(level = "info", skip_all)]
    pub fn change_master_password(
        &self,
        current: &str,
        new: &str,
    ) -> Result<(), VaultOperationError> {
        let mut settings = self.settings.load()?;
        let stored = settings
            .master_password_hash
            .clone()
            .ok_or(VaultOperationError::NotInitialized)?;

        if !verifier::verify(current, &stored) {
            warn!("master password change rejected - current password mismatch");
            return Err(VaultOperationError::IncorrectPassword);
        }

        let entries = self.entries.list_all()?;
        let revealed: Vec<(VaultEntry, RevealedEntry)> = entries
            .into_iter()
            .map(|entry| {
                let revealed = reveal_with(&entry, current)?;
                Ok((entry, revealed))
            })
            .collect::<Result<_, CryptoError>>()?;

        // Entries first, record last: a failure part-way leaves the old
        // record valid for the entries not yet rewritten.
        for (entry, revealed) in revealed {
            let salt = random::generate_salt();
            let encrypted_password =
                envelope::encrypt(revealed.password.expose_secret(), new, &salt)?;
            let encrypted_notes = revealed
                .notes
                .as_ref()
                .map(|n| envelope::encrypt(n.expose_secret(), new, &salt))
                .transpose()?;

            self.entries.put(VaultEntry {
                entry_salt: salt,
                encrypted_password,
                encrypted_notes,
                last_updated: unix_now(),
                ..entry
            })?;
        }

        settings.master_password_hash = Some(verifier::hash(new));
        self.settings.save(&settings)?;
        self.session.unlock(new);
        info!("master password changed");
        Ok(())
    }
}

fn reveal_with(entry: &VaultEntry, master: &str) -> Result<RevealedEntry, CryptoError> {
    let password = envelope::decrypt(&entry.encrypted_password, master, &entry.entry_salt)?;
    let notes = entry
        .encrypted_notes
        .as_ref()
        .map(|n| envelope::decrypt(n, master, &entry.entry_salt))
        .transpose()?;

    Ok(RevealedEntry {
        id: entry.id,
        service_name: entry.service_name.clone(),
        username: entry.username.clone(),
        password: SecretString::from(password),
        notes: notes.map(SecretString::from),
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::vault::settings::MemorySettingsStore;
    use crate::vault::store::MemoryEntryStore;

    const MASTER: &str = "Tr0ub4dor&3";

    fn test_vault() -> Vault {
        Vault::new(
            Box::new(MemoryEntryStore::new()),
            Box::new(MemorySettingsStore::new()),
            Arc::new(Session::new()),
        )
    }

    fn unlocked_vault() -> Vault {
        let vault = test_vault();
        vault.initialize(MASTER).unwrap();
        vault
    }

    fn new_entry(service: &str, password: &str) -> NewEntry {
        NewEntry {
            service_name: service.into(),
            username: "alice".into(),
            password: SecretString::from(password.to_owned()),
            notes: None,
        }
    }

    #[test]
    fn test_initialize_then_login() {
        let vault = test_vault();
        assert!(!vault.is_initialized().unwrap());

        vault.initialize(MASTER).unwrap();
        assert!(vault.is_initialized().unwrap());
        assert!(vault.session().is_unlocked());

        vault.lock();
        assert!(matches!(
            vault.login("wrong"),
            Err(VaultOperationError::IncorrectPassword)
        ));
        assert!(!vault.session().is_unlocked());

        vault.login(MASTER).unwrap();
        assert!(vault.session().is_unlocked());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let vault = unlocked_vault();
        assert!(matches!(
            vault.initialize(MASTER),
            Err(VaultOperationError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_login_uninitialized_fails() {
        let vault = test_vault();
        assert!(matches!(
            vault.login(MASTER),
            Err(VaultOperationError::NotInitialized)
        ));
    }

    #[test]
    fn test_add_and_reveal_entry() {
        let vault = unlocked_vault();
        let entry = vault
            .add_entry(NewEntry {
                service_name: "example.com".into(),
                username: "alice".into(),
                password: SecretString::from("correct horse battery staple".to_owned()),
                notes: Some(SecretString::from("recovery codes: 1 2 3".to_owned())),
            })
            .unwrap();

        let revealed = vault.reveal(entry.id).unwrap();
        assert_eq!(
            revealed.password.expose_secret(),
            "correct horse battery staple"
        );
        assert_eq!(
            revealed.notes.as_ref().unwrap().expose_secret(),
            "recovery codes: 1 2 3"
        );
    }

    #[test]
    fn test_operations_fail_when_locked() {
        let vault = unlocked_vault();
        let entry = vault.add_entry(new_entry("svc", "pw")).unwrap();

        vault.lock();
        assert!(matches!(
            vault.reveal(entry.id),
            Err(VaultOperationError::Session(SessionError::Expired))
        ));
        assert!(matches!(
            vault.add_entry(new_entry("other", "pw")),
            Err(VaultOperationError::Session(SessionError::Expired))
        ));
        // Metadata listing needs no password.
        assert_eq!(vault.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_reveal_missing_entry() {
        let vault = unlocked_vault();
        let id = Uuid::new_v4();
        assert!(matches!(
            vault.reveal(id),
            Err(VaultOperationError::EntryNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_find_by_service() {
        let vault = unlocked_vault();
        vault.add_entry(new_entry("GitHub", "a")).unwrap();
        vault.add_entry(new_entry("github-enterprise", "b")).unwrap();
        vault.add_entry(new_entry("mail", "c")).unwrap();

        assert_eq!(vault.find_by_service("github").unwrap().len(), 2);
        assert_eq!(vault.find_by_service("nothing").unwrap().len(), 0);
    }

    #[test]
    fn test_update_rotates_salt() {
        let vault = unlocked_vault();
        let entry = vault.add_entry(new_entry("svc", "old-password")).unwrap();

        let updated = vault
            .update_entry(
                entry.id,
                EntryUpdate {
                    password: Some(SecretString::from("new-password".to_owned())),
                    ..EntryUpdate::default()
                },
            )
            .unwrap();

        assert_ne!(updated.entry_salt, entry.entry_salt);
        assert_ne!(updated.encrypted_password, entry.encrypted_password);
        let revealed = vault.reveal(entry.id).unwrap();
        assert_eq!(revealed.password.expose_secret(), "new-password");
    }

    #[test]
    fn test_metadata_update_still_rotates_salt() {
        let vault = unlocked_vault();
        let entry = vault.add_entry(new_entry("svc", "kept-password")).unwrap();

        let updated = vault
            .update_entry(
                entry.id,
                EntryUpdate {
                    username: Some("bob".into()),
                    ..EntryUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.username, "bob");
        assert_ne!(updated.entry_salt, entry.entry_salt);
        let revealed = vault.reveal(entry.id).unwrap();
        assert_eq!(revealed.password.expose_secret(), "kept-password");
    }

    #[test]
    fn test_reveal_all_isolates_failures() {
        let vault = unlocked_vault();
        vault.add_entry(new_entry("good-1", "pw1")).unwrap();
        let corrupt = vault.add_entry(new_entry("corrupt", "pw2")).unwrap();
        vault.add_entry(new_entry("good-2", "pw3")).unwrap();

        // Corrupt one entry's envelope behind the vault's back.
        vault
            .entries
            .put(VaultEntry {
                encrypted_password: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".into(),
                ..corrupt
            })
            .unwrap();

        let revealed = vault.reveal_all().unwrap();
        assert_eq!(revealed.len(), 3);
        let failures: Vec<_> = revealed
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(entry, _)| entry.service_name.as_str())
            .collect();
        assert_eq!(failures, ["corrupt"]);
    }

    #[test]
    fn test_delete_entry() {
        let vault = unlocked_vault();
        let entry = vault.add_entry(new_entry("svc", "pw")).unwrap();
        vault.delete_entry(entry.id).unwrap();
        assert!(vault.entries().unwrap().is_empty());
    }

    #[test]
    fn test_change_master_password_rekeys_entries() {
        let vault = unlocked_vault();
        let before = vault.add_entry(new_entry("svc", "the-secret")).unwrap();

        vault.change_master_password(MASTER, "NewMaster!9").unwrap();

        let after = vault.entry(before.id).unwrap();
        assert_ne!(after.entry_salt, before.entry_salt);
        assert_ne!(after.encrypted_password, before.encrypted_password);

        // Old password no longer logs in; the new one does and decrypts.
        vault.lock();
        assert!(matches!(
            vault.login(MASTER),
            Err(VaultOperationError::IncorrectPassword)
        ));
        vault.login("NewMaster!9").unwrap();
        let revealed = vault.reveal(before.id).unwrap();
        assert_eq!(revealed.password.expose_secret(), "the-secret");
    }

    #[test]
    fn test_change_master_password_wrong_current() {
        let vault = unlocked_vault();
        vault.add_entry(new_entry("svc", "pw")).unwrap();
        assert!(matches!(
            vault.change_master_password("wrong", "new"),
            Err(VaultOperationError::IncorrectPassword)
        ));
        // Nothing was rewritten.
        vault.login(MASTER).unwrap();
    }

    #[test]
    fn test_biometric_preference_round_trip() {
        let vault = unlocked_vault();
        assert!(!vault.biometric_enabled().unwrap());
        vault.set_biometric_enabled(true).unwrap();
        assert!(vault.biometric_enabled().unwrap());
    }
}
