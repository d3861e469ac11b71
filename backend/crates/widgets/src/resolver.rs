use std::collections::{BTreeMap, HashSet};

use crate::request::ComponentScope;
use insights_topology::{DirectoryService, NodeKind, TopologyCache};

fn active_children(cache: &dyn TopologyCache, id: &str, kind: NodeKind) -> Vec<String> {
    cache
        .children_of_type(id, kind)
        .into_iter()
        .filter(|child| !cache.is_disabled(child))
        .collect()
}

/// Directory services in scope, minus components disabled in the topology.
pub fn components_in_scope<'a>(
    cache: Option<&dyn TopologyCache>,
    services: &'a [DirectoryService],
    scope: &ComponentScope,
) -> Vec<&'a DirectoryService> {
    services
        .iter()
        .filter(|s| scope.includes(&s.id))
        .filter(|s| !cache.is_some_and(|c| c.is_disabled(&s.id)))
        .collect()
}

/// Automations that can currently run for the scoped services: every enabled
/// automation under an enabled branch (only `branch` when one is given).
pub fn active_automations(
    cache: Option<&dyn TopologyCache>,
    services: &[DirectoryService],
    scope: &ComponentScope,
    branch: Option<&str>,
) -> Vec<String> {
    let Some(cache) = cache else {
        tracing::warn!("topology cache absent, no active automations resolved");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for service in services.iter().filter(|s| scope.includes(&s.id)) {
        for b in active_children(cache, &service.id, NodeKind::Branch) {
            if branch.is_some_and(|wanted| wanted != b) {
                continue;
            }
            for automation in active_children(cache, &b, NodeKind::Automation) {
                if seen.insert(automation.clone()) {
                    out.push(automation);
                }
            }
        }
    }
    out
}

/// Component id → automations under any of its enabled branches.
pub fn component_automation_map(
    cache: Option<&dyn TopologyCache>,
    component_ids: &[String],
) -> BTreeMap<String, Vec<String>> {
    let Some(cache) = cache else {
        tracing::warn!("topology cache absent, component automation map is empty");
        return BTreeMap::new();
    };

    component_ids
        .iter()
        .map(|component| {
            let automations = active_children(cache, component, NodeKind::Branch)
                .iter()
                .flat_map(|b| active_children(cache, b, NodeKind::Automation))
                .collect();
            (component.clone(), automations)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_topology::{InMemoryTopology, TopologyNode};

    fn service(id: &str) -> DirectoryService {
        DirectoryService {
            id: id.to_string(),
            repository_url: format!("https://git.example.com/{id}"),
            name: id.to_uppercase(),
        }
    }

    fn topology() -> InMemoryTopology {
        InMemoryTopology::from_nodes(vec![
            TopologyNode::new("c1", "api", NodeKind::Component).with_children(&["b1", "b2"]),
            TopologyNode::new("c2", "web", NodeKind::Component).with_children(&["b3"]),
            TopologyNode::new("c3", "old", NodeKind::Component).disabled(),
            TopologyNode::new("b1", "main", NodeKind::Branch).with_children(&["a1", "a2"]),
            TopologyNode::new("b2", "legacy", NodeKind::Branch)
                .disabled()
                .with_children(&["a3"]),
            TopologyNode::new("b3", "main", NodeKind::Branch).with_children(&["a4"]),
            TopologyNode::new("a1", "build", NodeKind::Automation),
            TopologyNode::new("a2", "nightly", NodeKind::Automation).disabled(),
            TopologyNode::new("a3", "old-build", NodeKind::Automation),
            TopologyNode::new("a4", "deploy", NodeKind::Automation),
        ])
    }

    #[test]
    fn active_automations_skip_disabled_nodes() {
        let topo = topology();
        let services = vec![service("c1"), service("c2")];
        let ids = active_automations(Some(&topo), &services, &ComponentScope::All, None);
        assert_eq!(ids, vec!["a1", "a4"]);
    }

    #[test]
    fn active_automations_respect_scope_and_branch() {
        let topo = topology();
        let services = vec![service("c1"), service("c2")];
        let scope = ComponentScope::Only(vec!["c2".to_string()]);
        assert_eq!(
            active_automations(Some(&topo), &services, &scope, None),
            vec!["a4"]
        );
        assert_eq!(
            active_automations(Some(&topo), &services, &ComponentScope::All, Some("b1")),
            vec!["a1"]
        );
    }

    #[test]
    fn absent_cache_yields_empty_collections() {
        let services = vec![service("c1")];
        assert!(active_automations(None, &services, &ComponentScope::All, None).is_empty());
        assert!(component_automation_map(None, &["c1".to_string()]).is_empty());
    }

    #[test]
    fn automation_map_groups_by_component() {
        let topo = topology();
        let map = component_automation_map(Some(&topo), &["c1".to_string(), "c2".to_string()]);
        assert_eq!(map["c1"], vec!["a1"]);
        assert_eq!(map["c2"], vec!["a4"]);
    }

    #[test]
    fn disabled_components_leave_scope() {
        let topo = topology();
        let services = vec![service("c1"), service("c3")];
        let ids: Vec<_> = components_in_scope(Some(&topo), &services, &ComponentScope::All)
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c1"]);
        assert_eq!(components_in_scope(None, &services, &ComponentScope::All).len(), 2);
    }
}
