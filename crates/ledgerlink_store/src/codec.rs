//! Line-oriented text snapshot format.
//!
//! One line per node, in registry order:
//!
//! ```text
//! <nodeId>:<syncTailId>:<blockId>,<blockId>,...,
//! ```
//!
//! `syncTailId` is `-1` when the node has no cursor. Every block id is
//! followed by a comma, so an empty node encodes as `<nodeId>:-1:`.

use crate::error::{StoreError, StoreResult};
use ledgerlink_core::{Block, BlockId, Node, NodeId, Registry, RegistryConfig};
use std::collections::HashSet;
use tracing::debug;

/// Sync tail value written for a node without a cursor.
pub const NO_SYNC_TAIL: &str = "-1";

/// Encodes every node of `registry`, one newline-terminated line each.
#[must_use]
pub fn encode(registry: &Registry) -> String {
    registry.nodes().map(encode_node).collect()
}

fn encode_node(node: &Node) -> String {
    let sync_tail = node
        .sync_tail_block()
        .map_or_else(|| NO_SYNC_TAIL.to_string(), |block| block.id().to_string());
    let blocks: String = node
        .blocks()
        .map(|(_, block)| format!("{},", block.id()))
        .collect();
    format!("{}:{}:{}\n", node.id(), sync_tail, blocks)
}

/// One parsed snapshot line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeRecord {
    node: NodeId,
    sync_tail: Option<BlockId>,
    blocks: Vec<BlockId>,
}

/// Rebuilds a registry from snapshot text.
///
/// Blank lines are skipped. The registry is returned only if every line is
/// valid; nothing is partially populated.
///
/// # Errors
///
/// Returns a malformed-input error ([`StoreError::is_malformed`]) on a
/// syntax error, a repeated node id, a block id repeated within one line, or
/// a sync tail that is neither `-1` nor one of the line's block ids.
/// Returns [`StoreError::Core`] if `config` limits are exceeded.
pub fn decode(text: &str, config: RegistryConfig) -> StoreResult<Registry> {
    let mut nodes = Vec::new();
    let mut seen = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let record = parse_line(line, raw)?;
        if !seen.insert(record.node) {
            return Err(StoreError::DuplicateNode {
                line,
                node: record.node,
            });
        }
        validate_blocks(line, &record)?;
        nodes.push(record);
    }

    let mut registry = Registry::with_config(config);
    for record in &nodes {
        let mut node = registry.create_node(record.node);
        for id in &record.blocks {
            node.append_block(Block::new(*id))?;
        }
        registry.add_node(node)?;
    }

    // Cursors are placed once every node is in, so a topology policy that
    // clears cursors on insertion cannot drop them.
    for record in &nodes {
        if let (Some(block), Some(node)) = (record.sync_tail, registry.find_node_mut(record.node)) {
            let link = node.find_block(block);
            node.set_sync_tail(link);
        }
    }

    debug!(nodes = registry.len(), "decoded snapshot");
    Ok(registry)
}

fn parse_line(line: usize, raw: &str) -> StoreResult<NodeRecord> {
    let fields: Vec<&str> = raw.split(':').collect();
    let [node, sync_tail, blocks] = fields.as_slice() else {
        return Err(StoreError::syntax(
            line,
            format!("expected 3 ':'-separated fields, found {}", fields.len()),
        ));
    };

    let node = parse_id(line, "node id", node)?;
    let sync_tail = match *sync_tail {
        NO_SYNC_TAIL => None,
        other => Some(parse_id(line, "sync tail", other)?),
    };
    let blocks = blocks
        .split(',')
        .filter(|item| !item.is_empty())
        .map(|item| parse_id(line, "block id", item))
        .collect::<StoreResult<Vec<_>>>()?;

    Ok(NodeRecord {
        node,
        sync_tail,
        blocks,
    })
}

fn parse_id(line: usize, what: &str, text: &str) -> StoreResult<u32> {
    text.parse()
        .map_err(|_| StoreError::syntax(line, format!("invalid {what} `{text}`")))
}

fn validate_blocks(line: usize, record: &NodeRecord) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for block in &record.blocks {
        if !seen.insert(*block) {
            return Err(StoreError::DuplicateBlock {
                line,
                node: record.node,
                block: *block,
            });
        }
    }
    match record.sync_tail {
        Some(block) if !seen.contains(&block) => Err(StoreError::UnknownSyncTail {
            line,
            node: record.node,
            block,
        }),
        _ => Ok(()),
    }
}
