//! Structural invariant checks.

use ledgerlink_core::{BlockChain, BlockId, Node, Registry};

/// Asserts that a chain is linear: forward and backward traversal are exact
/// reverses, and the head has no predecessor and the tail no successor.
///
/// # Panics
///
/// Panics with a description of the first violated invariant.
pub fn assert_chain_well_formed(chain: &BlockChain) {
    let forward: Vec<BlockId> = chain.iter().map(|(_, block)| block.id()).collect();
    let mut backward: Vec<BlockId> = chain.iter_rev().map(|(_, block)| block.id()).collect();
    backward.reverse();

    assert_eq!(forward, backward, "forward and backward traversal disagree");
    assert_eq!(forward.len(), chain.len(), "length does not match traversal");
    if let Some(head) = chain.head() {
        assert_eq!(chain.prev(head), None, "head has a predecessor");
    }
    if let Some(tail) = chain.tail() {
        assert_eq!(chain.next(tail), None, "tail has a successor");
    }
    assert_eq!(chain.head().is_none(), chain.tail().is_none());
}

/// Asserts chain invariants and that the cursor is absent or reachable from
/// the head.
///
/// # Panics
///
/// Panics with a description of the first violated invariant.
pub fn assert_node_well_formed(node: &Node) {
    assert_chain_well_formed(node.chain());
    if let Some(cursor) = node.sync_tail() {
        assert!(
            node.blocks().any(|(link, _)| link == cursor),
            "cursor of node {} is not reachable from its head",
            node.id()
        );
    }
}

/// Asserts node invariants for every node of the registry.
///
/// # Panics
///
/// Panics with a description of the first violated invariant.
pub fn assert_registry_well_formed(registry: &Registry) {
    let mut count = 0;
    for node in registry.nodes() {
        assert_node_well_formed(node);
        count += 1;
    }
    assert_eq!(count, registry.len(), "node count does not match traversal");
}
