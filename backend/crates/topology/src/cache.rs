use std::collections::HashMap;

use crate::models::{NodeKind, TopologyNode};

/// Read-only view of the resource topology. Implementations must be safe for
/// concurrent reads; the engine never mutates through this trait.
pub trait TopologyCache: Send + Sync {
    fn get(&self, id: &str) -> Option<TopologyNode>;

    /// Child ids of `id` whose node kind is `kind`, in declaration order.
    fn children_of_type(&self, id: &str, kind: NodeKind) -> Vec<String>;

    fn is_disabled(&self, id: &str) -> bool {
        self.get(id).map(|n| n.is_disabled).unwrap_or(false)
    }

    fn name_of(&self, id: &str) -> Option<String> {
        self.get(id).map(|n| n.name)
    }
}

/// Snapshot of the topology held in memory for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTopology {
    nodes: HashMap<String, TopologyNode>,
}

impl InMemoryTopology {
    pub fn from_nodes(nodes: Vec<TopologyNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl TopologyCache for InMemoryTopology {
    fn get(&self, id: &str) -> Option<TopologyNode> {
        self.nodes.get(id).cloned()
    }

    fn children_of_type(&self, id: &str, kind: NodeKind) -> Vec<String> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter(|child| self.nodes.get(*child).is_some_and(|c| c.kind == kind))
            .cloned()
            .collect()
    }
}
