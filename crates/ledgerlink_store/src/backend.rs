//! Snapshot store trait definition.

use crate::codec;
use crate::error::StoreResult;
use ledgerlink_core::{Registry, RegistryConfig};

/// A place where one registry snapshot is kept.
///
/// Stores are **opaque text holders**: they do not interpret the snapshot.
/// All format knowledge lives in [`crate::codec`].
///
/// # Invariants
///
/// - `load` returns exactly the text passed to the last successful `save`
/// - `load` returns `None` if nothing was ever saved
/// - A failed `save` leaves the previous snapshot intact
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait SnapshotStore: Send + Sync {
    /// Reads the stored snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn load(&self) -> StoreResult<Option<String>>;

    /// Replaces the stored snapshot with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written durably.
    fn save(&mut self, snapshot: &str) -> StoreResult<()>;
}

/// Loads and decodes the registry held by `store`.
///
/// Returns `Ok(None)` if the store is empty.
///
/// # Errors
///
/// Returns the store's read error or any decode error.
pub fn load_registry(
    store: &dyn SnapshotStore,
    config: RegistryConfig,
) -> StoreResult<Option<Registry>> {
    store
        .load()?
        .map(|text| codec::decode(&text, config))
        .transpose()
}

/// Encodes `registry` and saves it to `store`.
///
/// # Errors
///
/// Returns the store's write error.
pub fn save_registry(store: &mut dyn SnapshotStore, registry: &Registry) -> StoreResult<()> {
    store.save(&codec::encode(registry))
}
