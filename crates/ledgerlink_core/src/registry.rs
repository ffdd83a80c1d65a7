//! The registry: the ordered collection of all nodes.

use crate::config::{RegistryConfig, TopologyPolicy};
use crate::error::CoreResult;
use crate::list::{Link, SpliceList};
use crate::node::{Node, NodeId};
use tracing::debug;

/// Owns every node of one logical session, in arrival order.
///
/// Several registries can coexist; dropping one releases all of its nodes
/// and their blocks. Node ids are expected to be unique, which callers
/// check with [`Registry::contains_node`] before [`Registry::add_node`].
///
/// # Concurrency
///
/// Every operation assumes exclusive access for its whole duration. Share a
/// registry across threads through [`crate::SharedRegistry`].
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) nodes: SpliceList<Node>,
    pub(crate) config: RegistryConfig,
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with `config`.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            nodes: SpliceList::with_limit(config.max_nodes),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the registry has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates an empty node carrying this registry's block limit.
    ///
    /// The node is not added; pass it to [`Registry::add_node`].
    #[must_use]
    pub fn create_node(&self, id: NodeId) -> Node {
        Node::with_block_limit(id, self.config.max_blocks_per_node)
    }

    /// Appends `node` at the end of the registry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhausted` if the node cannot be stored; the
    /// registry is unchanged in that case.
    pub fn add_node(&mut self, node: Node) -> CoreResult<()> {
        let id = node.id();
        self.nodes.push_back(node)?;
        if self.config.topology_policy == TopologyPolicy::Eager {
            self.desync_all();
        }
        debug!(node = id, nodes = self.nodes.len(), "added node");
        Ok(())
    }

    /// Finds a node by id (linear scan).
    #[must_use]
    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(self.node_link(id)?)
    }

    /// Finds a node by id for mutation.
    pub fn find_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let link = self.node_link(id)?;
        self.nodes.get_mut(link)
    }

    /// Returns true if a node with `id` exists.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_link(id).is_some()
    }

    /// Removes the node with `id`, releasing it and its chain.
    ///
    /// Returns false if no such node exists.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(link) = self.node_link(id) else {
            return false;
        };
        let removed = self.nodes.remove(link);
        if self.config.topology_policy == TopologyPolicy::Eager {
            self.desync_all();
        }
        debug!(node = id, nodes = self.nodes.len(), "removed node");
        removed.is_some()
    }

    /// Iterates nodes in registry order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().map(|(_, node)| node)
    }

    /// Collects node ids in registry order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(Node::id).collect()
    }

    /// Returns true if the registry as a whole is synchronized.
    ///
    /// That holds when every node is empty, or when no node is empty and
    /// every node is locally synced. A registry without nodes is synced.
    #[must_use]
    pub fn is_synced(&self) -> bool {
        if self.nodes().all(Node::is_empty) {
            return true;
        }
        self.nodes()
            .all(|node| !node.is_empty() && node.is_locally_synced())
    }

    /// Releases every node and its blocks, leaving an empty registry.
    pub fn clear(&mut self) {
        let released = self.nodes.len();
        self.nodes.clear();
        debug!(nodes = released, "registry cleared");
    }

    fn node_link(&self, id: NodeId) -> Option<Link> {
        self.nodes.find(|node| node.id() == id)
    }

    fn desync_all(&mut self) {
        let mut cursor = self.nodes.head();
        while let Some(link) = cursor {
            cursor = self.nodes.next(link);
            if let Some(node) = self.nodes.get_mut(link) {
                node.desync();
            }
        }
    }
}
