//! # LedgerLink Core
//!
//! In-memory ledgers kept eventually consistent by explicit synchronization.
//!
//! This crate provides:
//! - [`BlockChain`]: a doubly linked chain of numbered [`Block`]s
//! - [`Node`]: one chain plus a cursor on the last synchronized block
//! - [`Registry`]: the ordered collection of nodes
//! - Full broadcast sync and incremental cursor advance over a registry
//! - [`SharedRegistry`]: a locked handle for use across threads
//!
//! ## Removal
//!
//! Chains and the node list share one list type, [`SpliceList`]. Removal
//! from any position links two guard entries around the list, relinks the
//! neighbours of the removed entry, and detaches the guards again.
//!
//! ## Example
//!
//! ```rust
//! use ledgerlink_core::{Block, Registry};
//!
//! let mut registry = Registry::new();
//! for (id, blocks) in [(1, [10, 20]), (2, [10, 30])] {
//!     let mut node = registry.create_node(id);
//!     for block in blocks {
//!         node.append_block(Block::new(block)).unwrap();
//!     }
//!     registry.add_node(node).unwrap();
//! }
//!
//! registry.synchronize().unwrap();
//! assert!(registry.is_synced());
//! assert_eq!(registry.find_node(2).unwrap().block_ids(), vec![10, 20, 30]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod config;
mod error;
mod list;
mod node;
mod registry;
mod shared;
mod sync;

pub use block::{Block, BlockChain, BlockId};
pub use config::{RegistryConfig, TopologyPolicy};
pub use error::{CoreError, CoreResult};
pub use list::{Iter, Link, SpliceList};
pub use node::{Node, NodeId};
pub use registry::Registry;
pub use shared::SharedRegistry;
pub use sync::{AdvanceReport, SyncOutcome};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
