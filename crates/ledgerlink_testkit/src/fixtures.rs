//! Registry fixtures.
//!
//! Layouts are written as `(node id, block ids)` pairs in registry order.

use ledgerlink_core::{Block, BlockId, NodeId, Registry, RegistryConfig};

/// Owned form of a registry layout, as returned by [`layout_of`].
pub type Layout = Vec<(NodeId, Vec<BlockId>)>;

/// Builds a registry with the default configuration from `layout`.
///
/// No cursor is set.
pub fn registry_from(layout: &[(NodeId, &[BlockId])]) -> Registry {
    registry_with_config(RegistryConfig::default(), layout)
}

/// Builds a registry with `config` from `layout`.
pub fn registry_with_config(config: RegistryConfig, layout: &[(NodeId, &[BlockId])]) -> Registry {
    let mut registry = Registry::with_config(config);
    for (id, blocks) in layout {
        let mut node = registry.create_node(*id);
        for block in *blocks {
            node.append_block(Block::new(*block))
                .expect("fixture block fits");
        }
        registry.add_node(node).expect("fixture node fits");
    }
    registry
}

/// Returns the registry's nodes and block ids in order.
pub fn layout_of(registry: &Registry) -> Layout {
    registry
        .nodes()
        .map(|node| (node.id(), node.block_ids()))
        .collect()
}

/// Returns each node's cursor as a block id, in registry order.
pub fn cursors_of(registry: &Registry) -> Vec<(NodeId, Option<BlockId>)> {
    registry
        .nodes()
        .map(|node| (node.id(), node.sync_tail_block().map(Block::id)))
        .collect()
}

/// Places the cursor of node `node` on its block `block`.
///
/// # Panics
///
/// Panics if the node or block does not exist.
pub fn set_cursor(registry: &mut Registry, node: NodeId, block: BlockId) {
    let node = registry.find_node_mut(node).expect("fixture node exists");
    let link = node.find_block(block).expect("fixture block exists");
    node.set_sync_tail(Some(link));
}
