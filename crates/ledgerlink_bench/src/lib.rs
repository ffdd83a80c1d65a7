//! Benchmark utilities.

use ledgerlink_core::{Block, BlockId, NodeId, Registry};
use rand::Rng;

/// Generate `count` random block ids below `id_space`.
pub fn random_ids(count: usize, id_space: BlockId) -> Vec<BlockId> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen_range(0..id_space)).collect()
}

/// Build a registry of `nodes` nodes, each holding up to `blocks` random ids.
///
/// Ids repeat across nodes but not within one, and no cursor is set, so a
/// full sync has every block to merge.
pub fn diverged_registry(nodes: usize, blocks: usize) -> Registry {
    let id_space = BlockId::try_from(blocks * 4).unwrap_or(BlockId::MAX).max(1);
    let mut registry = Registry::new();
    for id in 0..nodes {
        let mut node = registry.create_node(id as NodeId);
        for block in random_ids(blocks, id_space) {
            if !node.contains_block(block) {
                node.append_block(Block::new(block)).unwrap();
            }
        }
        registry.add_node(node).unwrap();
    }
    registry
}

/// Build a registry of `nodes` identical chains `0..blocks` without cursors.
///
/// The incremental advance walks every block of such a registry.
pub fn agreeing_registry(nodes: usize, blocks: usize) -> Registry {
    let mut registry = Registry::new();
    for id in 0..nodes {
        let mut node = registry.create_node(id as NodeId);
        for block in 0..blocks {
            node.append_block(Block::new(block as BlockId)).unwrap();
        }
        registry.add_node(node).unwrap();
    }
    registry
}
