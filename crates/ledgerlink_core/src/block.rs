//! Blocks and the block chain owned by a node.

use crate::error::CoreResult;
use crate::list::{Iter, Link, SpliceList};
use std::fmt;

/// Identifier of a block.
///
/// Unique only within one node's chain, and only because callers check for
/// an existing id before inserting.
pub type BlockId = u32;

/// A single numbered entry in a node's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    id: BlockId,
}

impl Block {
    /// Creates a block with the given id.
    #[inline]
    #[must_use]
    pub const fn new(id: BlockId) -> Self {
        Self { id }
    }

    /// Returns the block id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// An ordered, doubly linked sequence of blocks.
///
/// The chain exclusively owns its blocks. Dropping it releases every block.
#[derive(Debug, Default)]
pub struct BlockChain {
    blocks: SpliceList<Block>,
}

impl BlockChain {
    /// Creates an empty, unbounded chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty chain holding at most `limit` blocks.
    #[must_use]
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            blocks: SpliceList::with_limit(limit),
        }
    }

    /// Builds a chain from ids, in iteration order.
    ///
    /// Duplicate ids are not rejected.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` if a block cannot be allocated.
    pub fn from_ids(ids: impl IntoIterator<Item = BlockId>) -> CoreResult<Self> {
        let mut chain = Self::new();
        for id in ids {
            chain.push(Block::new(id))?;
        }
        Ok(chain)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the chain has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the capacity limit, if any.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.blocks.limit()
    }

    /// Returns the first block's link.
    #[must_use]
    pub fn head(&self) -> Option<Link> {
        self.blocks.head()
    }

    /// Returns the last block's link.
    #[must_use]
    pub fn tail(&self) -> Option<Link> {
        self.blocks.tail()
    }

    /// Returns the last block.
    #[must_use]
    pub fn tail_block(&self) -> Option<&Block> {
        self.blocks.tail().and_then(|link| self.blocks.get(link))
    }

    /// Returns the block behind `link`.
    #[must_use]
    pub fn get(&self, link: Link) -> Option<&Block> {
        self.blocks.get(link)
    }

    /// Returns the block following `link`.
    #[must_use]
    pub fn next(&self, link: Link) -> Option<Link> {
        self.blocks.next(link)
    }

    /// Returns the block preceding `link`.
    #[must_use]
    pub fn prev(&self, link: Link) -> Option<Link> {
        self.blocks.prev(link)
    }

    /// Finds the first block with `id` by a linear scan from the head.
    #[must_use]
    pub fn find(&self, id: BlockId) -> Option<Link> {
        self.blocks.find(|block| block.id == id)
    }

    /// Returns true if a block with `id` is present.
    #[must_use]
    pub fn contains(&self, id: BlockId) -> bool {
        self.find(id).is_some()
    }

    /// Iterates blocks head to tail.
    pub fn iter(&self) -> Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Iterates blocks from `start` (inclusive) to the tail.
    pub fn iter_from(&self, start: Option<Link>) -> Iter<'_, Block> {
        self.blocks.iter_from(start)
    }

    /// Iterates blocks tail to head.
    pub fn iter_rev(&self) -> Iter<'_, Block> {
        self.blocks.iter_rev()
    }

    /// Collects block ids head to tail.
    #[must_use]
    pub fn ids(&self) -> Vec<BlockId> {
        self.iter().map(|(_, block)| block.id).collect()
    }

    /// Links `block` after the current tail.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` if the block cannot be allocated.
    pub fn push(&mut self, block: Block) -> CoreResult<Link> {
        self.blocks.push_back(block)
    }

    /// Splices all blocks of `other` onto the tail.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` without modifying either chain if the
    /// result cannot be allocated.
    pub fn append(&mut self, other: BlockChain) -> CoreResult<()> {
        self.blocks.append(other.blocks)
    }

    /// Deep-copies the chain: same ids and order, fresh links.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` if the copy cannot be allocated; `self`
    /// is left untouched.
    pub fn try_clone(&self) -> CoreResult<Self> {
        Ok(Self {
            blocks: self.blocks.try_clone()?,
        })
    }

    /// Removes the block behind `link`, keeping `cursor` on a live block.
    ///
    /// See [`SpliceList::remove_tracking`] for how the cursor moves.
    pub fn remove(&mut self, link: Link, cursor: &mut Option<Link>) -> Option<Block> {
        self.blocks.remove_tracking(link, cursor)
    }

    /// Releases every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
