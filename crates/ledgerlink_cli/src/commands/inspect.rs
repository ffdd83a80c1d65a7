//! Inspect command implementation.

use crate::error::{CliError, CliResult};
use ledgerlink_core::{Block, BlockId, NodeId, Registry, RegistryConfig};
use ledgerlink_store::{load_registry, FileStore};
use serde::Serialize;
use std::io::Write;

/// Output format for `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Human-readable listing.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Saved registry summary.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Save file path.
    pub path: String,
    /// Number of nodes.
    pub node_count: usize,
    /// Whether the registry is synchronized.
    pub synced: bool,
    /// Per-node details, in registry order.
    pub nodes: Vec<NodeReport>,
}

/// Details for a single node.
#[derive(Debug, Serialize)]
pub struct NodeReport {
    /// Node id.
    pub id: NodeId,
    /// Block under the sync cursor.
    pub sync_tail: Option<BlockId>,
    /// Number of blocks after the cursor.
    pub pending: usize,
    /// Block ids in chain order.
    pub blocks: Vec<BlockId>,
}

impl InspectResult {
    fn from_registry(path: String, registry: &Registry) -> Self {
        let nodes = registry
            .nodes()
            .map(|node| NodeReport {
                id: node.id(),
                sync_tail: node.sync_tail_block().map(Block::id),
                pending: node.pending_suffix().count(),
                blocks: node.block_ids(),
            })
            .collect();
        Self {
            path,
            node_count: registry.len(),
            synced: registry.is_synced(),
            nodes,
        }
    }
}

/// Runs the inspect command.
///
/// # Errors
///
/// Returns [`CliError::NoSaveFile`] if nothing is saved at the store's path,
/// or the load error if the file is malformed.
pub fn run(
    store: &FileStore,
    config: RegistryConfig,
    format: Format,
    out: &mut impl Write,
) -> CliResult<()> {
    let registry = load_registry(store, config)?
        .ok_or_else(|| CliError::NoSaveFile(store.path().to_path_buf()))?;
    let result = InspectResult::from_registry(store.path().display().to_string(), &registry);

    match format {
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?,
        Format::Text => print_text_output(&result, out)?,
    }
    Ok(())
}

fn print_text_output(result: &InspectResult, out: &mut impl Write) -> CliResult<()> {
    writeln!(out, "Save file: {}", result.path)?;
    writeln!(out, "Nodes:     {}", result.node_count)?;
    writeln!(out, "Synced:    {}", if result.synced { "yes" } else { "no" })?;

    for node in &result.nodes {
        let cursor = node
            .sync_tail
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let blocks: Vec<String> = node.blocks.iter().map(ToString::to_string).collect();
        writeln!(
            out,
            "  node {:>5}  cursor {:>5}  pending {:>3}  [{}]",
            node.id,
            cursor,
            node.pending,
            blocks.join(", ")
        )?;
    }
    Ok(())
}
