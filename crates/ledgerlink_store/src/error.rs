//! Error types for snapshot operations.

use ledgerlink_core::{BlockId, CoreError, NodeId};
use std::io;
use thiserror::Error;

/// Result type for snapshot operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing snapshots.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line does not follow `<node>:<sync tail>:<block>,...`.
    #[error("line {line}: {message}")]
    Syntax {
        /// Offending line.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A node id appears on more than one line.
    #[error("line {line}: node {node} is defined twice")]
    DuplicateNode {
        /// Offending line.
        line: usize,
        /// Repeated node id.
        node: NodeId,
    },

    /// A block id repeats within one node's block list.
    #[error("line {line}: block {block} appears twice in node {node}")]
    DuplicateBlock {
        /// Offending line.
        line: usize,
        /// Node whose list repeats the block.
        node: NodeId,
        /// Repeated block id.
        block: BlockId,
    },

    /// The sync tail names a block missing from the node's list.
    #[error("line {line}: sync tail {block} is not a block of node {node}")]
    UnknownSyncTail {
        /// Offending line.
        line: usize,
        /// Node whose cursor cannot be resolved.
        node: NodeId,
        /// Referenced block id.
        block: BlockId,
    },

    /// The registry could not be rebuilt.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a syntax error.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Returns true if the snapshot text itself is malformed.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            StoreError::Syntax { .. }
                | StoreError::DuplicateNode { .. }
                | StoreError::DuplicateBlock { .. }
                | StoreError::UnknownSyncTail { .. }
        )
    }
}
