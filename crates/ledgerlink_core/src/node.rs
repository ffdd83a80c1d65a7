//! A node: one block chain plus its synchronization cursor.

use crate::block::{Block, BlockChain, BlockId};
use crate::error::CoreResult;
use crate::list::{Iter, Link};
use tracing::debug;

/// Identifier of a node, unique across a registry by caller contract.
pub type NodeId = u32;

/// An independent ordered chain of blocks with a sync cursor.
///
/// The cursor (`sync_tail`) marks the last block known to match every other
/// node. It is either `None` or the link of a block in this node's chain.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    chain: BlockChain,
    sync_tail: Option<Link>,
}

impl Node {
    /// Creates an empty, unbounded node.
    #[must_use]
    pub fn new(id: NodeId) -> Self {
        Self::with_block_limit(id, None)
    }

    /// Creates an empty node whose chain holds at most `limit` blocks.
    #[must_use]
    pub fn with_block_limit(id: NodeId, limit: Option<usize>) -> Self {
        Self {
            id,
            chain: BlockChain::with_limit(limit),
            sync_tail: None,
        }
    }

    /// Returns the node id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's chain.
    #[must_use]
    pub fn chain(&self) -> &BlockChain {
        &self.chain
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns true if the node holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Finds a block by id (linear scan).
    #[must_use]
    pub fn find_block(&self, id: BlockId) -> Option<Link> {
        self.chain.find(id)
    }

    /// Returns true if the node holds a block with `id`.
    #[must_use]
    pub fn contains_block(&self, id: BlockId) -> bool {
        self.chain.contains(id)
    }

    /// Returns the block behind `link`.
    #[must_use]
    pub fn block(&self, link: Link) -> Option<&Block> {
        self.chain.get(link)
    }

    /// Iterates blocks head to tail.
    pub fn blocks(&self) -> Iter<'_, Block> {
        self.chain.iter()
    }

    /// Collects block ids head to tail.
    #[must_use]
    pub fn block_ids(&self) -> Vec<BlockId> {
        self.chain.ids()
    }

    /// Appends `block` after the current tail.
    ///
    /// Does not check for an existing block with the same id.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` if the block cannot be stored.
    pub fn append_block(&mut self, block: Block) -> CoreResult<Link> {
        self.chain.push(block)
    }

    /// Splices a whole chain onto the tail.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` without modifying the node if the chain
    /// does not fit.
    pub fn append_chain(&mut self, chain: BlockChain) -> CoreResult<()> {
        self.chain.append(chain)
    }

    /// Removes the block behind `link` and returns it.
    ///
    /// If the block was the sync cursor, the cursor moves to its predecessor
    /// (or becomes `None` when it was the head). Removing the only block
    /// resets the node to empty.
    pub fn remove_block(&mut self, link: Link) -> Option<Block> {
        let removed = self.chain.remove(link, &mut self.sync_tail);
        if let Some(block) = &removed {
            debug!(node = self.id, block = block.id(), "removed block");
        }
        removed
    }

    /// Removes the block with `id`, if present.
    pub fn remove_block_by_id(&mut self, id: BlockId) -> Option<Block> {
        let link = self.find_block(id)?;
        self.remove_block(link)
    }

    /// Returns the sync cursor.
    #[must_use]
    pub fn sync_tail(&self) -> Option<Link> {
        self.sync_tail
    }

    /// Returns the block under the sync cursor.
    #[must_use]
    pub fn sync_tail_block(&self) -> Option<&Block> {
        self.sync_tail.and_then(|link| self.chain.get(link))
    }

    /// Places the cursor on `link`, or clears it with `None`.
    ///
    /// Returns false, leaving the cursor unchanged, if `link` is not a block
    /// of this node.
    pub fn set_sync_tail(&mut self, link: Option<Link>) -> bool {
        match link {
            Some(link) if self.chain.get(link).is_none() => false,
            _ => {
                self.sync_tail = link;
                true
            }
        }
    }

    /// Returns true if the cursor sits on the tail (both `None` when empty).
    #[must_use]
    pub fn is_locally_synced(&self) -> bool {
        self.sync_tail == self.chain.tail()
    }

    /// Moves the cursor to the tail.
    pub fn mark_fully_synced(&mut self) {
        self.sync_tail = self.chain.tail();
    }

    /// Clears the cursor so the whole chain counts as pending.
    pub fn desync(&mut self) {
        self.sync_tail = None;
    }

    /// Returns the first block after the cursor, or the head without one.
    #[must_use]
    pub fn pending_start(&self) -> Option<Link> {
        match self.sync_tail {
            Some(link) => self.chain.next(link),
            None => self.chain.head(),
        }
    }

    /// Iterates the blocks not yet broadcast to other nodes.
    pub fn pending_suffix(&self) -> Iter<'_, Block> {
        self.chain.iter_from(self.pending_start())
    }

    /// Returns the link following `link` in this node's chain.
    #[must_use]
    pub fn next_block(&self, link: Link) -> Option<Link> {
        self.chain.next(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with(id: NodeId, blocks: &[BlockId]) -> Node {
        let mut node = Node::new(id);
        for block in blocks {
            node.append_block(Block::new(*block)).unwrap();
        }
        node
    }

    fn pending_ids(node: &Node) -> Vec<BlockId> {
        node.pending_suffix().map(|(_, b)| b.id()).collect()
    }

    #[test]
    fn new_node_is_empty_and_synced() {
        let node = Node::new(1);
        assert!(node.is_empty());
        assert_eq!(node.sync_tail(), None);
        assert!(node.is_locally_synced());
        assert_eq!(pending_ids(&node), Vec::<BlockId>::new());
    }

    #[test]
    fn append_block_sets_head_and_tail() {
        let node = node_with(1, &[10, 20]);
        assert_eq!(node.block_ids(), vec![10, 20]);
        assert!(!node.is_locally_synced());
    }

    #[test]
    fn remove_only_block_resets_node() {
        let mut node = node_with(1, &[10]);
        node.mark_fully_synced();

        assert_eq!(node.remove_block_by_id(10), Some(Block::new(10)));
        assert!(node.is_empty());
        assert_eq!(node.sync_tail(), None);
        assert!(node.find_block(10).is_none());
    }

    #[test]
    fn remove_middle_keeps_cursor_on_tail() {
        let mut node = node_with(1, &[5, 6, 7]);
        node.mark_fully_synced();

        node.remove_block_by_id(6);
        assert_eq!(node.block_ids(), vec![5, 7]);
        assert_eq!(node.sync_tail_block().map(Block::id), Some(7));
        assert!(node.is_locally_synced());
    }

    #[test]
    fn removing_cursor_block_moves_cursor_back() {
        let mut node = node_with(1, &[5, 6, 7]);
        let six = node.find_block(6).unwrap();
        assert!(node.set_sync_tail(Some(six)));

        node.remove_block(six);
        assert_eq!(node.sync_tail_block().map(Block::id), Some(5));
        assert_eq!(pending_ids(&node), vec![7]);
    }

    #[test]
    fn removing_cursor_head_clears_cursor() {
        let mut node = node_with(1, &[5, 6, 7]);
        let five = node.find_block(5).unwrap();
        node.set_sync_tail(Some(five));

        node.remove_block(five);
        assert_eq!(node.sync_tail(), None);
        assert_eq!(pending_ids(&node), vec![6, 7]);
    }

    #[test]
    fn set_sync_tail_rejects_foreign_link() {
        let mut node = node_with(1, &[5]);
        let other = node_with(2, &[5, 6]);
        let foreign = other.find_block(6).unwrap();

        assert!(!node.set_sync_tail(Some(foreign)));
        assert_eq!(node.sync_tail(), None);
    }

    #[test]
    fn set_sync_tail_rejects_stale_link() {
        let mut node = node_with(1, &[5, 6]);
        let six = node.find_block(6).unwrap();
        node.remove_block(six);
        node.append_block(Block::new(7)).unwrap();

        assert!(!node.set_sync_tail(Some(six)));
        assert_eq!(node.sync_tail(), None);
        assert_eq!(node.block(six), None);
    }

    #[test]
    fn pending_suffix_follows_cursor() {
        let mut node = node_with(1, &[1, 2, 3]);
        assert_eq!(pending_ids(&node), vec![1, 2, 3]);

        let two = node.find_block(2).unwrap();
        node.set_sync_tail(Some(two));
        assert_eq!(pending_ids(&node), vec![3]);

        node.mark_fully_synced();
        assert!(pending_ids(&node).is_empty());

        node.desync();
        assert_eq!(pending_ids(&node), vec![1, 2, 3]);
    }

    #[test]
    fn append_chain_onto_empty_and_non_empty() {
        let mut node = Node::new(1);
        node.append_chain(BlockChain::from_ids([1, 2]).unwrap()).unwrap();
        assert_eq!(node.block_ids(), vec![1, 2]);

        node.append_chain(BlockChain::from_ids([3]).unwrap()).unwrap();
        assert_eq!(node.block_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn block_limit_is_enforced() {
        let mut node = Node::with_block_limit(1, Some(1));
        node.append_block(Block::new(1)).unwrap();
        assert!(node.append_block(Block::new(2)).is_err());
        assert!(node
            .append_chain(BlockChain::from_ids([3]).unwrap())
            .is_err());
        assert_eq!(node.block_ids(), vec![1]);
    }
}
