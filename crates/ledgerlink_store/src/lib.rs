//! # LedgerLink Store
//!
//! Text snapshots of a LedgerLink registry.
//!
//! This crate provides:
//! - [`codec`]: the line-oriented snapshot format, one line per node
//! - [`SnapshotStore`]: where a snapshot lives
//! - [`FileStore`] and [`InMemoryStore`] backends
//!
//! Loading is all-or-nothing: a malformed snapshot never yields a partially
//! populated registry.
//!
//! ## Example
//!
//! ```rust
//! use ledgerlink_core::RegistryConfig;
//! use ledgerlink_store::{load_registry, save_registry, InMemoryStore};
//!
//! let mut store = InMemoryStore::with_snapshot("1:10:10,\n2:10:10,\n");
//! let registry = load_registry(&store, RegistryConfig::default())
//!     .unwrap()
//!     .unwrap();
//! assert!(registry.is_synced());
//!
//! save_registry(&mut store, &registry).unwrap();
//! assert_eq!(store.snapshot().as_deref(), Some("1:10:10,\n2:10:10,\n"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
pub mod codec;
mod error;
mod file;
mod memory;

pub use backend::{load_registry, save_registry, SnapshotStore};
pub use codec::{decode, encode};
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
