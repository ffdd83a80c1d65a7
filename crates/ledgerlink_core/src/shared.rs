//! Thread-safe handle around a registry.

use crate::error::CoreResult;
use crate::registry::Registry;
use crate::sync::{AdvanceReport, SyncOutcome};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A cloneable handle that serializes all access to one [`Registry`].
///
/// Every topology change and every synchronization pass runs under a single
/// exclusive lock held for the whole operation. There is no finer-grained
/// locking.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    /// Wraps `registry` in a shared handle.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Acquires the exclusive lock.
    pub fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock()
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut registry = self.inner.lock();
        f(&mut registry)
    }

    /// Runs a full broadcast sync under the lock.
    ///
    /// # Errors
    ///
    /// See [`Registry::synchronize`].
    pub fn synchronize(&self) -> CoreResult<SyncOutcome> {
        self.with(Registry::synchronize)
    }

    /// Runs an incremental advance under the lock.
    pub fn advance_sync_state(&self) -> AdvanceReport {
        self.with(Registry::advance_sync_state)
    }

    /// Returns the global synced predicate under the lock.
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.inner.lock().is_synced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use std::thread;

    #[test]
    fn concurrent_writers_then_sync() {
        let shared = SharedRegistry::default();
        shared.with(|registry| {
            for id in 0..4 {
                let node = registry.create_node(id);
                registry.add_node(node).unwrap();
            }
        });

        let handles: Vec<_> = (0..4u32)
            .map(|id| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.with(|registry| {
                        registry
                            .find_node_mut(id)
                            .unwrap()
                            .append_block(Block::new(100 + id))
                            .unwrap();
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.synchronize().unwrap();
        assert!(shared.is_synced());

        let registry = shared.lock();
        let first = registry.nodes().next().unwrap().block_ids();
        assert_eq!(first.len(), 4);
        assert!(registry.nodes().all(|node| node.block_ids() == first));
    }

    #[test]
    fn advance_through_handle() {
        let shared = SharedRegistry::new(Registry::new());
        shared.with(|registry| {
            let mut node = registry.create_node(1);
            node.append_block(Block::new(7)).unwrap();
            registry.add_node(node).unwrap();
        });
        assert_eq!(shared.advance_sync_state().steps, 1);
        assert!(shared.is_synced());
    }
}
