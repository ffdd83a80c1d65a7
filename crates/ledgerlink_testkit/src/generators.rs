//! Property-based test generators using proptest.
//!
//! Ids are drawn from small ranges so that generated operations collide
//! often: duplicates, removals of present blocks and agreement between
//! nodes all show up in short sequences.

use ledgerlink_core::{Block, BlockId, NodeId, Registry};
use proptest::prelude::*;

/// Largest node id produced by the generators.
pub const MAX_NODE_ID: NodeId = 5;

/// Largest block id produced by the generators.
pub const MAX_BLOCK_ID: BlockId = 12;

/// A mutation applied to a single chain.
#[derive(Debug, Clone)]
pub enum ChainOp {
    /// Append a block with this id.
    Append(BlockId),
    /// Remove the block at this position (modulo the chain length).
    RemoveAt(usize),
    /// Put the cursor on the block at this position (modulo the length).
    CursorAt(usize),
}

/// A command applied to a registry, mirroring the command layer.
#[derive(Debug, Clone)]
pub enum RegistryOp {
    /// Add a node unless the id is taken.
    AddNode(NodeId),
    /// Remove a node if present.
    RemoveNode(NodeId),
    /// Append a block to a node unless it already holds the id.
    AddBlock {
        /// Target node.
        node: NodeId,
        /// Block id.
        block: BlockId,
    },
    /// Remove a block id from every node holding it.
    RemoveBlock(BlockId),
    /// Run the full broadcast sync.
    Sync,
    /// Run the incremental advance.
    Advance,
}

/// Strategy for block ids.
pub fn block_id_strategy() -> impl Strategy<Value = BlockId> {
    0..=MAX_BLOCK_ID
}

/// Strategy for node ids.
pub fn node_id_strategy() -> impl Strategy<Value = NodeId> {
    0..=MAX_NODE_ID
}

/// Strategy for a single chain mutation.
pub fn chain_op_strategy() -> impl Strategy<Value = ChainOp> {
    prop_oneof![
        3 => block_id_strategy().prop_map(ChainOp::Append),
        2 => any::<usize>().prop_map(ChainOp::RemoveAt),
        1 => any::<usize>().prop_map(ChainOp::CursorAt),
    ]
}

/// Strategy for a sequence of chain mutations.
pub fn chain_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<ChainOp>> {
    prop::collection::vec(chain_op_strategy(), 0..max_len)
}

/// Strategy for a single registry command.
pub fn registry_op_strategy() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        2 => node_id_strategy().prop_map(RegistryOp::AddNode),
        1 => node_id_strategy().prop_map(RegistryOp::RemoveNode),
        5 => (node_id_strategy(), block_id_strategy())
            .prop_map(|(node, block)| RegistryOp::AddBlock { node, block }),
        2 => block_id_strategy().prop_map(RegistryOp::RemoveBlock),
        1 => Just(RegistryOp::Sync),
        1 => Just(RegistryOp::Advance),
    ]
}

/// Strategy for a sequence of registry commands.
pub fn registry_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<RegistryOp>> {
    prop::collection::vec(registry_op_strategy(), 0..max_len)
}

/// Strategy for registry layouts with unique node ids and unique block ids
/// per node.
pub fn layout_strategy() -> impl Strategy<Value = Vec<(NodeId, Vec<BlockId>)>> {
    prop::collection::btree_map(
        node_id_strategy(),
        prop::collection::btree_set(block_id_strategy(), 0..6),
        0..5,
    )
    .prop_map(|nodes| {
        nodes
            .into_iter()
            .map(|(id, blocks)| (id, blocks.into_iter().collect()))
            .collect()
    })
}

/// Applies `op` to a registry with the same duplicate checks the command layer
/// performs.
///
/// # Panics
///
/// Panics if an insertion fails; generated registries are unbounded.
pub fn apply_registry_op(registry: &mut Registry, op: &RegistryOp) {
    match op {
        RegistryOp::AddNode(id) => {
            if !registry.contains_node(*id) {
                let node = registry.create_node(*id);
                registry.add_node(node).expect("unbounded registry");
            }
        }
        RegistryOp::RemoveNode(id) => {
            registry.remove_node(*id);
        }
        RegistryOp::AddBlock { node, block } => {
            if let Some(node) = registry.find_node_mut(*node) {
                if !node.contains_block(*block) {
                    node.append_block(Block::new(*block))
                        .expect("unbounded chain");
                }
            }
        }
        RegistryOp::RemoveBlock(block) => {
            let ids = registry.node_ids();
            for id in ids {
                if let Some(node) = registry.find_node_mut(id) {
                    node.remove_block_by_id(*block);
                }
            }
        }
        RegistryOp::Sync => {
            registry.synchronize().expect("unbounded registry");
        }
        RegistryOp::Advance => {
            registry.advance_sync_state();
        }
    }
}
