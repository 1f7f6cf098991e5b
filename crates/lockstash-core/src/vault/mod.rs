//! Vault-level abstractions and operations

pub mod entry;
pub mod operations;
pub mod settings;
pub mod store;

#[cfg(feature = "async")]
pub mod operations_async;

// Re-export commonly used types
pub use entry::{RevealedEntry, VaultEntry};
pub use operations::{EntryUpdate, NewEntry, Vault, VaultOperationError};
pub use settings::{JsonSettingsStore, MemorySettingsStore, SettingsStore, VaultSettings};
pub use store::{EntryStore, JsonEntryStore, MemoryEntryStore, StoreError};

#[cfg(feature = "async")]
pub use operations_async::VaultAsync;
