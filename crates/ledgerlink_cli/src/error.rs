//! Error types for the command layer.

use ledgerlink_core::{BlockId, CoreError, NodeId};
use ledgerlink_store::StoreError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by the shell and the maintenance commands.
///
/// The first six variants are per-command failures: the shell prints them
/// and keeps reading. The rest end the process.
#[derive(Debug, Error)]
pub enum CliError {
    /// An allocation failed while adding nodes or blocks, or during a sync.
    #[error("no more resources available on the computer")]
    NoResources(#[from] CoreError),

    /// `add node` named an id that is already registered.
    #[error("this node already exists")]
    NodeExists(NodeId),

    /// `add block` targeted a node that already holds the block.
    #[error("this block already exists")]
    BlockExists {
        /// Target node.
        node: NodeId,
        /// Block id.
        block: BlockId,
    },

    /// A command named an unknown node.
    #[error("node doesn't exist")]
    NodeNotFound(NodeId),

    /// `rm block` named a block no node holds.
    #[error("block doesn't exist")]
    BlockNotFound(BlockId),

    /// The line is not a valid command.
    #[error("command not found")]
    CommandNotFound,

    /// The save file could not be loaded or written.
    #[error("save file: {0}")]
    Store(#[from] StoreError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A maintenance command found no save file.
    #[error("no save file at {}", .0.display())]
    NoSaveFile(PathBuf),

    /// `verify` found a problem.
    #[error("verification failed: {0}")]
    Verification(String),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Returns true if the shell should report this error and continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoResources(_)
                | Self::NodeExists(_)
                | Self::BlockExists { .. }
                | Self::NodeNotFound(_)
                | Self::BlockNotFound(_)
                | Self::CommandNotFound
        )
    }
}
