//! Async wrappers dispatching vault operations to a blocking worker pool.
//!
//! PBKDF2 at 65 536 iterations is deliberately slow, so every operation that
//! derives a key is CPU-bound for a human-noticeable amount of time and must
//! not run on an interactive thread. These wrappers move the work onto
//! tokio's blocking pool. The underlying computations are not cancellable:
//! dropping a returned future abandons the result, but the blocking task
//! runs to completion (there are no side effects to roll back mid-way).

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::crypto::CryptoError;

use super::entry::{RevealedEntry, VaultEntry};
use super::operations::{EntryUpdate, NewEntry, Vault, VaultOperationError};

/// Shared-ownership async facade over a [`Vault`].
#[derive(Clone)]
pub struct VaultAsync {
    inner: Arc<Vault>,
}

impl VaultAsync {
    pub fn new(vault: Vault) -> Self {
        Self {
            inner: Arc::new(vault),
        }
    }

    /// Direct access to the synchronous vault for cheap, non-deriving calls
    /// (listing metadata, locking).
    pub fn vault(&self) -> &Vault {
        &self.inner
    }

    async fn run<R, F>(&self, f: F) -> Result<R, VaultOperationError>
    where
        F: FnOnce(&Vault) -> Result<R, VaultOperationError> + Send + 'static,
        R: Send + 'static,
    {
        let vault = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&vault))
            .await
            .map_err(|e| VaultOperationError::Background(e.to_string()))?
    }

    pub async fn initialize(&self, master_password: SecretString) -> Result<(), VaultOperationError> {
        self.run(move |vault| vault.initialize(master_password.expose_secret()))
            .await
    }

    pub async fn login(&self, master_password: SecretString) -> Result<(), VaultOperationError> {
        self.run(move |vault| vault.login(master_password.expose_secret()))
            .await
    }

    pub async fn add_entry(&self, new: NewEntry) -> Result<VaultEntry, VaultOperationError> {
        self.run(move |vault| vault.add_entry(new)).await
    }

    pub async fn reveal(&self, id: Uuid) -> Result<RevealedEntry, VaultOperationError> {
        self.run(move |vault| vault.reveal(id)).await
    }

    pub async fn reveal_all(
        &self,
    ) -> Result<Vec<(VaultEntry, Result<RevealedEntry, CryptoError>)>, VaultOperationError> {
        self.run(Vault::reveal_all).await
    }

    pub async fn update_entry(
        &self,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<VaultEntry, VaultOperationError> {
        self.run(move |vault| vault.update_entry(id, update)).await
    }

    pub async fn change_master_password(
        &self,
        current: SecretString,
        new: SecretString,
    ) -> Result<(), VaultOperationError> {
        self.run(move |vault| {
            vault.change_master_password(current.expose_secret(), new.expose_secret())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::vault::settings::MemorySettingsStore;
    use crate::vault::store::MemoryEntryStore;

    fn test_vault() -> VaultAsync {
        VaultAsync::new(Vault::new(
            Box::new(MemoryEntryStore::new()),
            Box::new(MemorySettingsStore::new()),
            Arc::new(Session::new()),
        ))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_async_round_trip() {
        let vault = test_vault();
        vault
            .initialize(SecretString::from("Tr0ub4dor&3".to_owned()))
            .await
            .unwrap();

        let entry = vault
            .add_entry(NewEntry {
                service_name: "example.com".into(),
                username: "alice".into(),
                password: SecretString::from("secret".to_owned()),
                notes: None,
            })
            .await
            .unwrap();

        let revealed = vault.reveal(entry.id).await.unwrap();
        assert_eq!(revealed.password.expose_secret(), "secret");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_async_login_failure_propagates() {
        let vault = test_vault();
        vault
            .initialize(SecretString::from("master".to_owned()))
            .await
            .unwrap();
        vault.vault().lock();

        let result = vault.login(SecretString::from("wrong".to_owned())).await;
        assert!(matches!(result, Err(VaultOperationError::IncorrectPassword)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_reveals() {
        let vault = test_vault();
        vault
            .initialize(SecretString::from("master".to_owned()))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for i in 0..4 {
            let entry = vault
                .add_entry(NewEntry {
                    service_name: format!("service-{i}"),
                    username: "u".into(),
                    password: SecretString::from(format!("password-{i}")),
                    notes: None,
                })
                .await
                .unwrap();
            ids.push(entry.id);
        }

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let vault = vault.clone();
                tokio::spawn(async move { vault.reveal(id).await })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let revealed = handle.await.unwrap().unwrap();
            assert_eq!(
                revealed.password.expose_secret(),
                format!("password-{i}").as_str()
            );
        }
    }
}
