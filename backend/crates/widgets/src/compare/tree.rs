use std::collections::HashSet;

use insights_topology::{NodeKind, TopologyCache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgComponent {
    pub id: String,
    pub name: String,
}

/// Organization subtree used by comparison widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub components: Vec<OrgComponent>,
    pub sub_orgs: Vec<Organization>,
}

impl Organization {
    pub fn empty(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            components: Vec::new(),
            sub_orgs: Vec::new(),
        }
    }

    /// Components in the whole subtree.
    pub fn component_count(&self) -> usize {
        self.components.len()
            + self
                .sub_orgs
                .iter()
                .map(Organization::component_count)
                .sum::<usize>()
    }

    /// Sub-organizations in the whole subtree.
    pub fn sub_org_count(&self) -> usize {
        self.sub_orgs.len()
            + self
                .sub_orgs
                .iter()
                .map(Organization::sub_org_count)
                .sum::<usize>()
    }

    /// Component ids in traversal order.
    pub fn component_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.components.iter().map(|c| c.id.clone()).collect();
        for sub in &self.sub_orgs {
            ids.extend(sub.component_ids());
        }
        ids
    }
}

/// Build the tree rooted at `org_id` from the topology. Without a cache the
/// tree is just the root with no children.
pub fn build_organization(cache: Option<&dyn TopologyCache>, org_id: &str) -> Organization {
    let Some(cache) = cache else {
        tracing::warn!(org_id, "topology cache absent, comparison tree is empty");
        return Organization::empty(org_id);
    };
    let mut visited = HashSet::new();
    build(cache, org_id, &mut visited)
}

fn build(cache: &dyn TopologyCache, id: &str, visited: &mut HashSet<String>) -> Organization {
    visited.insert(id.to_string());
    let name = cache.name_of(id).unwrap_or_else(|| id.to_string());

    let components = cache
        .children_of_type(id, NodeKind::Component)
        .into_iter()
        .filter(|c| !cache.is_disabled(c))
        .map(|c| OrgComponent {
            name: cache.name_of(&c).unwrap_or_else(|| c.clone()),
            id: c,
        })
        .collect();

    let mut sub_orgs = Vec::new();
    for child in cache.children_of_type(id, NodeKind::Organization) {
        if visited.contains(&child) {
            tracing::warn!(org = %child, "organization cycle in topology, skipping");
            continue;
        }
        sub_orgs.push(build(cache, &child, visited));
    }

    Organization {
        id: id.to_string(),
        name,
        components,
        sub_orgs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_topology::{InMemoryTopology, TopologyNode};

    fn topology() -> InMemoryTopology {
        InMemoryTopology::from_nodes(vec![
            TopologyNode::new("org", "Acme", NodeKind::Organization)
                .with_children(&["c1", "c2", "c9", "sub"]),
            TopologyNode::new("sub", "Payments", NodeKind::Organization)
                .with_children(&["c3", "org"]),
            TopologyNode::new("c1", "api", NodeKind::Component),
            TopologyNode::new("c2", "web", NodeKind::Component),
            TopologyNode::new("c9", "retired", NodeKind::Component).disabled(),
            TopologyNode::new("c3", "ledger", NodeKind::Component),
        ])
    }

    #[test]
    fn tree_follows_topology_order_without_disabled_components() {
        let topo = topology();
        let org = build_organization(Some(&topo), "org");
        assert_eq!(org.name, "Acme");
        let names: Vec<_> = org.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["api", "web"]);
        assert_eq!(org.sub_orgs.len(), 1);
        assert_eq!(org.sub_orgs[0].components[0].id, "c3");
        assert_eq!(org.component_ids(), vec!["c1", "c2", "c3"]);
        assert_eq!(org.component_count(), 3);
    }

    #[test]
    fn cycles_are_cut() {
        let topo = topology();
        let org = build_organization(Some(&topo), "org");
        assert!(org.sub_orgs[0].sub_orgs.is_empty());
    }

    #[test]
    fn absent_cache_gives_bare_root() {
        let org = build_organization(None, "org");
        assert_eq!(org, Organization::empty("org"));
    }
}
