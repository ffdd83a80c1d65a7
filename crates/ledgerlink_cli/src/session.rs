//! Command execution against a registry and its save file.

use crate::error::{CliError, CliResult};
use crate::parse::{Command, Target};
use ledgerlink_core::{Block, BlockId, NodeId, Registry, SyncOutcome};
use ledgerlink_store::{save_registry, SnapshotStore};
use std::io::Write;
use tracing::debug;

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// The registry was saved; stop.
    Quit,
}

/// What a command did.
///
/// A command that names several ids reports one failure per rejected id and
/// still applies the others.
#[derive(Debug)]
pub struct Outcome {
    /// Next step for the shell.
    pub flow: Flow,
    /// Per-id failures, in the order they happened.
    pub failures: Vec<CliError>,
}

impl Outcome {
    fn proceed(failures: Vec<CliError>) -> Self {
        Self {
            flow: Flow::Continue,
            failures,
        }
    }
}

/// A registry bound to the store it is saved to.
pub struct Session<S: SnapshotStore> {
    registry: Registry,
    store: S,
}

impl<S: SnapshotStore> Session<S> {
    /// Creates a session over `registry`, saving to `store`.
    pub fn new(registry: Registry, store: S) -> Self {
        Self { registry, store }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the store.
    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the shell prompt: `[s<n>]> ` when synced, `[-<n>]> ` otherwise.
    pub fn prompt(&self) -> String {
        let state = if self.registry.is_synced() { 's' } else { '-' };
        format!("[{}{}]> ", state, self.registry.len())
    }

    /// Saves the registry to the store.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Store`] if the store cannot be written.
    pub fn save(&mut self) -> CliResult<()> {
        save_registry(&mut self.store, &self.registry)?;
        Ok(())
    }

    /// Runs `command`, writing any listing to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error only if `out` or the store fails. Rejected ids are
    /// reported in [`Outcome::failures`].
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> CliResult<Outcome> {
        let failures = match command {
            Command::AddNode(ids) => self.add_nodes(&ids),
            Command::AddBlock { block, target } => {
                let failures = self.add_block(block, target);
                self.advance();
                failures
            }
            Command::RemoveNode(target) => self.remove_nodes(target),
            Command::RemoveBlock(ids) => {
                let failures = self.remove_blocks(&ids);
                self.advance();
                failures
            }
            Command::List { long } => {
                self.list(long, out)?;
                Vec::new()
            }
            Command::Sync => self.sync(),
            Command::Quit => {
                self.save()?;
                return Ok(Outcome {
                    flow: Flow::Quit,
                    failures: Vec::new(),
                });
            }
        };
        Ok(Outcome::proceed(failures))
    }

    fn add_nodes(&mut self, ids: &[NodeId]) -> Vec<CliError> {
        let mut failures = Vec::new();
        for &id in ids {
            if self.registry.contains_node(id) {
                failures.push(CliError::NodeExists(id));
                continue;
            }
            let node = self.registry.create_node(id);
            if let Err(err) = self.registry.add_node(node) {
                failures.push(err.into());
                break;
            }
        }
        failures
    }

    fn add_block(&mut self, block: BlockId, target: Target) -> Vec<CliError> {
        let nodes = match target {
            Target::All => self.registry.node_ids(),
            Target::Nodes(ids) => ids,
        };

        let mut failures = Vec::new();
        for id in nodes {
            let Some(node) = self.registry.find_node_mut(id) else {
                failures.push(CliError::NodeNotFound(id));
                continue;
            };
            if node.contains_block(block) {
                failures.push(CliError::BlockExists { node: id, block });
                continue;
            }
            if let Err(err) = node.append_block(Block::new(block)) {
                failures.push(err.into());
                break;
            }
        }
        failures
    }

    fn remove_nodes(&mut self, target: Target) -> Vec<CliError> {
        match target {
            Target::All => {
                for id in self.registry.node_ids() {
                    self.registry.remove_node(id);
                }
                Vec::new()
            }
            Target::Nodes(ids) => ids
                .into_iter()
                .filter(|&id| !self.registry.remove_node(id))
                .map(CliError::NodeNotFound)
                .collect(),
        }
    }

    fn remove_blocks(&mut self, ids: &[BlockId]) -> Vec<CliError> {
        let nodes = self.registry.node_ids();
        let mut failures = Vec::new();
        for &block in ids {
            let mut removed = 0usize;
            for &node in &nodes {
                if let Some(node) = self.registry.find_node_mut(node) {
                    while node.remove_block_by_id(block).is_some() {
                        removed += 1;
                    }
                }
            }
            if removed == 0 {
                failures.push(CliError::BlockNotFound(block));
            }
        }
        failures
    }

    fn list(&self, long: bool, out: &mut impl Write) -> CliResult<()> {
        for node in self.registry.nodes() {
            write!(out, "{}: ", node.id())?;
            if long {
                for (_, block) in node.blocks() {
                    write!(out, "{block}, ")?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn sync(&mut self) -> Vec<CliError> {
        match self.registry.synchronize() {
            Ok(SyncOutcome::AlreadySynced) => Vec::new(),
            Ok(SyncOutcome::Broadcast { blocks, nodes }) => {
                debug!(blocks, nodes, "sync command broadcast");
                Vec::new()
            }
            Err(err) => vec![err.into()],
        }
    }

    fn advance(&mut self) {
        self.registry.advance_sync_state();
    }
}
