//! Verify command implementation.

use crate::error::{CliError, CliResult};
use ledgerlink_core::{NodeId, Registry, RegistryConfig};
use ledgerlink_store::{load_registry, FileStore};
use std::io::Write;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of nodes loaded.
    pub nodes: usize,
    /// Number of blocks across all nodes.
    pub blocks: usize,
    /// Nodes whose cursor is not on their last block.
    pub unsynced: Vec<NodeId>,
    /// Whether the registry as a whole is synchronized.
    pub synced: bool,
}

impl VerifyResult {
    fn check(registry: &Registry) -> Self {
        Self {
            nodes: registry.len(),
            blocks: registry.nodes().map(|node| node.len()).sum(),
            unsynced: registry
                .nodes()
                .filter(|node| !node.is_locally_synced())
                .map(|node| node.id())
                .collect(),
            synced: registry.is_synced(),
        }
    }
}

/// Runs the verify command.
///
/// A save file that loads is well formed. With `strict`, an unsynchronized
/// registry also fails verification.
///
/// # Errors
///
/// Returns the load error for a malformed file, [`CliError::NoSaveFile`] if
/// nothing is saved, or [`CliError::Verification`] in strict mode when the
/// registry is not synchronized.
pub fn run(
    store: &FileStore,
    config: RegistryConfig,
    strict: bool,
    out: &mut impl Write,
) -> CliResult<VerifyResult> {
    writeln!(out, "Verifying save file at {}", store.path().display())?;

    let registry = load_registry(store, config)?
        .ok_or_else(|| CliError::NoSaveFile(store.path().to_path_buf()))?;
    let result = VerifyResult::check(&registry);

    writeln!(
        out,
        "  well formed: {} nodes, {} blocks",
        result.nodes, result.blocks
    )?;
    if result.synced {
        writeln!(out, "  synchronized")?;
    } else if result.unsynced.is_empty() {
        writeln!(out, "  not synchronized: some nodes are empty")?;
    } else {
        let ids: Vec<String> = result.unsynced.iter().map(ToString::to_string).collect();
        writeln!(out, "  not synchronized: pending blocks on {}", ids.join(", "))?;
    }

    if strict && !result.synced {
        return Err(CliError::Verification("registry is not synchronized".into()));
    }
    writeln!(out, "✓ Save file verification passed")?;
    Ok(result)
}
