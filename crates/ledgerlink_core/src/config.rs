//! Registry configuration.

/// How a registry treats existing sync cursors when its node set changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopologyPolicy {
    /// Leave cursors alone; divergence is picked up by the next
    /// incremental advance or full sync.
    #[default]
    Lazy,
    /// Clear every node's cursor whenever a node is added or removed.
    Eager,
}

/// Configuration for a [`crate::Registry`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Cursor handling on node add/remove.
    pub topology_policy: TopologyPolicy,

    /// Maximum number of nodes (`None` = unbounded).
    pub max_nodes: Option<usize>,

    /// Maximum number of blocks per chain, including the full-sync
    /// aggregation buffer (`None` = unbounded).
    pub max_blocks_per_node: Option<usize>,
}

impl RegistryConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the topology policy.
    #[must_use]
    pub const fn topology_policy(mut self, policy: TopologyPolicy) -> Self {
        self.topology_policy = policy;
        self
    }

    /// Sets the node limit.
    #[must_use]
    pub const fn max_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_nodes = limit;
        self
    }

    /// Sets the per-chain block limit.
    #[must_use]
    pub const fn max_blocks_per_node(mut self, limit: Option<usize>) -> Self {
        self.max_blocks_per_node = limit;
        self
    }
}
