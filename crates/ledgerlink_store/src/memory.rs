//! In-memory snapshot store for testing.

use crate::backend::SnapshotStore;
use crate::error::StoreResult;
use parking_lot::RwLock;

/// A snapshot store that keeps the text in memory.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use ledgerlink_store::{InMemoryStore, SnapshotStore};
///
/// let mut store = InMemoryStore::new();
/// assert_eq!(store.load().unwrap(), None);
/// store.save("1:-1:\n").unwrap();
/// assert_eq!(store.load().unwrap().as_deref(), Some("1:-1:\n"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: RwLock<Option<String>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `snapshot`.
    ///
    /// Useful for testing load paths.
    #[must_use]
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot.into())),
        }
    }

    /// Returns a copy of the stored snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.read().clone()
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.snapshot.read().clone())
    }

    fn save(&mut self, snapshot: &str) -> StoreResult<()> {
        *self.snapshot.write() = Some(snapshot.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{load_registry, save_registry};
    use ledgerlink_core::{Block, Registry, RegistryConfig};

    #[test]
    fn memory_new_is_empty() {
        let store = InMemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        assert!(load_registry(&store, RegistryConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn memory_save_replaces_snapshot() {
        let mut store = InMemoryStore::with_snapshot("1:-1:\n");
        store.save("2:-1:\n").unwrap();
        assert_eq!(store.snapshot().as_deref(), Some("2:-1:\n"));
    }

    #[test]
    fn memory_registry_round_trip() {
        let mut registry = Registry::new();
        let mut node = registry.create_node(4);
        node.append_block(Block::new(8)).unwrap();
        node.mark_fully_synced();
        registry.add_node(node).unwrap();

        let mut store = InMemoryStore::new();
        save_registry(&mut store, &registry).unwrap();
        assert_eq!(store.snapshot().as_deref(), Some("4:8:8,\n"));

        let loaded = load_registry(&store, RegistryConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.find_node(4).unwrap().block_ids(), vec![8]);
        assert!(loaded.is_synced());
    }

    #[test]
    fn memory_malformed_snapshot_fails_load() {
        let store = InMemoryStore::with_snapshot("1:-1:\n1:-1:\n");
        let err = load_registry(&store, RegistryConfig::default()).unwrap_err();
        assert!(err.is_malformed());
    }
}
