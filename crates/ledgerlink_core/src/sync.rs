//! Registry-wide synchronization passes.
//!
//! Two passes reconcile the chains of a registry:
//!
//! - [`Registry::synchronize`] merges every node's pending suffix into one
//!   deduplicated buffer and appends a copy of it to every node.
//! - [`Registry::advance_sync_state`] moves cursors forward over the
//!   position-wise common prefix of the pending suffixes, without touching
//!   any block.
//!
//! # Failure
//!
//! The full sync is not atomic. Blocks are detached from their node as soon
//! as they are copied into the buffer, so a `ResourceExhausted` error part
//! way through leaves the registry stripped of the blocks gathered so far.

use crate::block::{Block, BlockChain, BlockId};
use crate::error::CoreResult;
use crate::list::Link;
use crate::registry::Registry;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Result of a full broadcast sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No node had pending blocks; nothing was changed.
    AlreadySynced,
    /// Pending blocks were merged and appended to every node.
    Broadcast {
        /// Number of distinct blocks in the merged buffer.
        blocks: usize,
        /// Number of nodes that received the buffer.
        nodes: usize,
    },
}

/// Result of an incremental advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceReport {
    /// Number of positions every cursor moved forward.
    pub steps: usize,
    /// Id of the last block all nodes agree on, if any cursor moved.
    pub frontier: Option<BlockId>,
}

impl Registry {
    /// Makes every node's chain identical and marks all nodes synced.
    ///
    /// Pending suffixes are collected in registry order and, within a node,
    /// in chain order. The first occurrence of each id is kept. The merged
    /// buffer is then appended to every node.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` if the buffer or a copy of it cannot be
    /// allocated. Work done before the failure is not rolled back.
    pub fn synchronize(&mut self) -> CoreResult<SyncOutcome> {
        let mut buffer = BlockChain::with_limit(self.config.max_blocks_per_node);

        if let Err(err) = self.gather_pending(&mut buffer) {
            warn!(error = %err, "full sync aborted while gathering");
            return Err(err);
        }

        if buffer.is_empty() {
            debug!("full sync found no pending blocks");
            return Ok(SyncOutcome::AlreadySynced);
        }

        if let Err(err) = self.broadcast(&buffer) {
            warn!(error = %err, "full sync aborted while broadcasting");
            return Err(err);
        }

        let outcome = SyncOutcome::Broadcast {
            blocks: buffer.len(),
            nodes: self.nodes.len(),
        };
        info!(blocks = buffer.len(), nodes = self.nodes.len(), "full sync complete");
        Ok(outcome)
    }

    /// Advances cursors over the blocks on which all nodes already agree.
    ///
    /// Each node is scanned from the first block after its cursor. While
    /// every scan sits on a block and all of those blocks share one id,
    /// that position joins the common frontier and every scan steps
    /// forward. Cursors of nodes whose scan moved are then placed on the
    /// last common block. Block membership and order never change.
    pub fn advance_sync_state(&mut self) -> AdvanceReport {
        let mut scans: Vec<Option<Link>> = self
            .nodes
            .iter()
            .map(|(_, node)| node.pending_start())
            .collect();
        let mut reached: Vec<Option<Link>> = vec![None; scans.len()];
        let mut report = AdvanceReport::default();

        while let Some(id) = self.common_scan_id(&scans) {
            for ((_, node), (scan, last)) in self
                .nodes
                .iter()
                .zip(scans.iter_mut().zip(reached.iter_mut()))
            {
                *last = *scan;
                *scan = scan.and_then(|link| node.next_block(link));
            }
            report.steps += 1;
            report.frontier = Some(id);
        }

        let mut cursor = self.nodes.head();
        let mut index = 0;
        while let Some(link) = cursor {
            cursor = self.nodes.next(link);
            if let (Some(node), Some(Some(last))) = (self.nodes.get_mut(link), reached.get(index)) {
                node.set_sync_tail(Some(*last));
            }
            index += 1;
        }

        if report.steps > 0 {
            debug!(steps = report.steps, frontier = ?report.frontier, "sync cursors advanced");
        }
        report
    }

    fn gather_pending(&mut self, buffer: &mut BlockChain) -> CoreResult<()> {
        let mut seen: HashSet<BlockId> = HashSet::new();
        let mut cursor = self.nodes.head();

        while let Some(node_link) = cursor {
            cursor = self.nodes.next(node_link);
            let Some(node) = self.nodes.get_mut(node_link) else {
                continue;
            };

            let mut pending = node.pending_start();
            while let Some(block_link) = pending {
                pending = node.next_block(block_link);
                let Some(id) = node.block(block_link).map(Block::id) else {
                    break;
                };
                if !seen.contains(&id) {
                    seen.try_reserve(1)?;
                    buffer.push(Block::new(id))?;
                    seen.insert(id);
                }
                node.remove_block(block_link);
            }
        }
        Ok(())
    }

    fn broadcast(&mut self, buffer: &BlockChain) -> CoreResult<()> {
        let mut cursor = self.nodes.head();
        while let Some(link) = cursor {
            cursor = self.nodes.next(link);
            if let Some(node) = self.nodes.get_mut(link) {
                node.append_chain(buffer.try_clone()?)?;
                node.mark_fully_synced();
            }
        }
        Ok(())
    }

    /// Returns the shared id under every scan, or `None` if a scan ran
    /// off its chain, the ids differ, or there are no nodes.
    fn common_scan_id(&self, scans: &[Option<Link>]) -> Option<BlockId> {
        let mut common = None;
        for ((_, node), scan) in self.nodes.iter().zip(scans) {
            let id = node.block((*scan)?)?.id();
            match common {
                None => common = Some(id),
                Some(expected) if expected != id => return None,
                Some(_) => {}
            }
        }
        common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::node::NodeId;

    fn registry_with(config: RegistryConfig, layout: &[(NodeId, &[BlockId])]) -> Registry {
        let mut registry = Registry::with_config(config);
        for (id, blocks) in layout {
            let mut node = registry.create_node(*id);
            for block in *blocks {
                node.append_block(Block::new(*block)).unwrap();
            }
            registry.add_node(node).unwrap();
        }
        registry
    }

    fn ids(registry: &Registry, id: NodeId) -> Vec<BlockId> {
        registry.find_node(id).unwrap().block_ids()
    }

    fn cursor_id(registry: &Registry, id: NodeId) -> Option<BlockId> {
        registry
            .find_node(id)
            .unwrap()
            .sync_tail_block()
            .map(Block::id)
    }

    #[test]
    fn full_sync_merges_in_first_seen_order() {
        let mut registry =
            registry_with(RegistryConfig::default(), &[(1, &[10, 20]), (2, &[10, 30])]);

        let outcome = registry.synchronize().unwrap();
        assert_eq!(outcome, SyncOutcome::Broadcast { blocks: 3, nodes: 2 });
        assert_eq!(ids(&registry, 1), vec![10, 20, 30]);
        assert_eq!(ids(&registry, 2), vec![10, 20, 30]);
        assert!(registry.is_synced());
    }

    #[test]
    fn full_sync_keeps_synced_prefix() {
        let mut registry = registry_with(RegistryConfig::default(), &[(1, &[1, 2]), (2, &[1])]);
        let node = registry.find_node_mut(1).unwrap();
        let one = node.find_block(1).unwrap();
        node.set_sync_tail(Some(one));
        let node = registry.find_node_mut(2).unwrap();
        node.mark_fully_synced();

        registry.synchronize().unwrap();
        assert_eq!(ids(&registry, 1), vec![1, 2]);
        assert_eq!(ids(&registry, 2), vec![1, 2]);
        assert!(registry.is_synced());
    }

    #[test]
    fn full_sync_is_idempotent() {
        let mut registry = registry_with(
            RegistryConfig::default(),
            &[(1, &[3, 1]), (2, &[2]), (3, &[])],
        );
        registry.synchronize().unwrap();
        let first: Vec<_> = [1, 2, 3].iter().map(|id| ids(&registry, *id)).collect();

        assert_eq!(registry.synchronize().unwrap(), SyncOutcome::AlreadySynced);
        let second: Vec<_> = [1, 2, 3].iter().map(|id| ids(&registry, *id)).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], vec![3, 1, 2]);
    }

    #[test]
    fn full_sync_on_empty_registry_is_noop() {
        let mut registry = Registry::new();
        assert_eq!(registry.synchronize().unwrap(), SyncOutcome::AlreadySynced);
        assert!(registry.is_synced());
    }

    #[test]
    fn full_sync_failure_is_not_rolled_back() {
        let config = RegistryConfig::new().max_blocks_per_node(Some(3));
        let mut registry = registry_with(config, &[(1, &[1, 2]), (2, &[3, 4])]);

        let err = registry.synchronize().unwrap_err();
        assert!(err.is_resource_exhausted());
        assert_eq!(ids(&registry, 1), Vec::<BlockId>::new());
        assert_eq!(ids(&registry, 2), vec![4]);
        assert!(!registry.is_synced());
    }

    #[test]
    fn advance_stops_at_first_disagreement() {
        let mut registry = registry_with(RegistryConfig::default(), &[(1, &[10, 20]), (2, &[10])]);

        let report = registry.advance_sync_state();
        assert_eq!(report, AdvanceReport { steps: 1, frontier: Some(10) });
        assert_eq!(cursor_id(&registry, 1), Some(10));
        assert_eq!(cursor_id(&registry, 2), Some(10));
        assert!(!registry.find_node(1).unwrap().is_locally_synced());
        assert!(registry.find_node(2).unwrap().is_locally_synced());
        assert!(!registry.is_synced());
    }

    #[test]
    fn advance_never_moves_blocks() {
        let mut registry =
            registry_with(RegistryConfig::default(), &[(1, &[1, 2, 3]), (2, &[1, 2, 4])]);
        registry.advance_sync_state();

        assert_eq!(ids(&registry, 1), vec![1, 2, 3]);
        assert_eq!(ids(&registry, 2), vec![1, 2, 4]);
        assert_eq!(cursor_id(&registry, 1), Some(2));
        assert_eq!(cursor_id(&registry, 2), Some(2));
    }

    #[test]
    fn advance_resumes_after_cursor() {
        let mut registry =
            registry_with(RegistryConfig::default(), &[(1, &[1, 2, 3]), (2, &[1, 2, 3])]);
        registry.advance_sync_state();
        assert!(registry.is_synced());

        registry
            .find_node_mut(1)
            .unwrap()
            .append_block(Block::new(4))
            .unwrap();
        let report = registry.advance_sync_state();
        assert_eq!(report.steps, 0);
        assert_eq!(cursor_id(&registry, 1), Some(3));

        registry
            .find_node_mut(2)
            .unwrap()
            .append_block(Block::new(4))
            .unwrap();
        let report = registry.advance_sync_state();
        assert_eq!(report, AdvanceReport { steps: 1, frontier: Some(4) });
        assert!(registry.is_synced());
    }

    #[test]
    fn advance_with_no_nodes_does_nothing() {
        let mut registry = Registry::new();
        assert_eq!(registry.advance_sync_state(), AdvanceReport::default());
        assert!(registry.is_synced());
    }

    #[test]
    fn advance_with_single_node_catches_up() {
        let mut registry = registry_with(RegistryConfig::default(), &[(1, &[4, 5])]);
        let report = registry.advance_sync_state();
        assert_eq!(report.steps, 2);
        assert!(registry.is_synced());
    }

    #[test]
    fn advance_blocked_by_empty_node() {
        let mut registry = registry_with(RegistryConfig::default(), &[(1, &[4]), (2, &[])]);
        assert_eq!(registry.advance_sync_state().steps, 0);
        assert_eq!(cursor_id(&registry, 1), None);
    }
}
