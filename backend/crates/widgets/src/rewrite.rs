use serde_json::{json, Value};

use crate::request::WidgetRequest;
use insights_topology::{NodeKind, TopologyCache};

/// How scope filters are injected into a bound query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RewriteMode {
    #[default]
    Default,
    Drilldown {
        add_automations: bool,
        add_branch_name: bool,
    },
    Sonar,
    Must {
        extra: Vec<Value>,
    },
    MustNot {
        extra: Vec<Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Filter,
    Must,
    MustNot,
}

impl Slot {
    fn key(&self) -> &'static str {
        match self {
            Slot::Filter => "filter",
            Slot::Must => "must",
            Slot::MustNot => "must_not",
        }
    }
}

fn component_clause(request: &WidgetRequest) -> Option<Value> {
    request
        .components
        .ids()
        .map(|ids| json!({"terms": {"component_id": ids}}))
}

fn branch_clause(
    request: &WidgetRequest,
    add_automations: bool,
    add_branch_name: bool,
    topology: Option<&dyn TopologyCache>,
) -> Option<Value> {
    let branch = request.branch()?;

    if add_automations {
        let Some(cache) = topology else {
            tracing::warn!(branch, "topology cache absent, branch automations not applied");
            return None;
        };
        let automations: Vec<String> = cache
            .children_of_type(branch, NodeKind::Automation)
            .into_iter()
            .filter(|id| !cache.is_disabled(id))
            .collect();
        return Some(json!({"terms": {"automation_id": automations}}));
    }

    if add_branch_name {
        let name = topology
            .and_then(|cache| cache.name_of(branch))
            .unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        return Some(json!({"term": {"branch": name}}));
    }

    Some(json!({"term": {"branch_id": branch}}))
}

fn additions(
    request: &WidgetRequest,
    mode: &RewriteMode,
    topology: Option<&dyn TopologyCache>,
) -> Vec<(Slot, Value)> {
    let mut out = Vec::new();
    let components = component_clause(request);

    match mode {
        RewriteMode::Default => {
            out.extend(components.map(|c| (Slot::Filter, c)));
        }
        RewriteMode::Drilldown {
            add_automations,
            add_branch_name,
        } => {
            out.extend(components.map(|c| (Slot::Filter, c)));
            if let Some(b) = branch_clause(request, *add_automations, *add_branch_name, topology) {
                out.push((Slot::Filter, b));
            }
        }
        RewriteMode::Sonar => {
            out.extend(components.map(|c| (Slot::Filter, c)));
            if let Some(branch) = request.branch() {
                out.push((Slot::Filter, json!({"term": {"github_branch_id": branch}})));
            }
        }
        RewriteMode::Must { extra } => {
            out.extend(components.map(|c| (Slot::Must, c)));
            out.extend(extra.iter().cloned().map(|e| (Slot::Must, e)));
        }
        RewriteMode::MustNot { extra } => {
            out.extend(components.map(|c| (Slot::Filter, c)));
            out.extend(extra.iter().cloned().map(|e| (Slot::MustNot, e)));
        }
    }

    out
}

/// Append the request's scope filters to `query.bool.<slot>`.
///
/// Returns the input unchanged when there is nothing to add, and falls back to
/// the input (with a warning) when the query lacks the addressed skeleton.
pub fn rewrite(
    query: &str,
    request: &WidgetRequest,
    mode: &RewriteMode,
    topology: Option<&dyn TopologyCache>,
) -> String {
    let additions = additions(request, mode, topology);
    if additions.is_empty() {
        return query.to_owned();
    }

    let mut parsed: Value = match serde_json::from_str(query) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "filter rewrite skipped: query is not JSON");
            return query.to_owned();
        }
    };

    for (slot, clause) in additions {
        let target = parsed
            .pointer_mut(&format!("/query/bool/{}", slot.key()))
            .and_then(Value::as_array_mut);
        match target {
            Some(list) => list.push(clause),
            None => {
                tracing::warn!(
                    slot = slot.key(),
                    "filter rewrite skipped: query.bool slot missing"
                );
                return query.to_owned();
            }
        }
    }

    serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| query.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ComponentScope;
    use insights_topology::{InMemoryTopology, TopologyNode};

    const QUERY: &str = r#"{"query":{"bool":{"filter":[{"term":{"org_id":"o"}}],"must":[],"must_not":[]}}}"#;

    fn request(components: ComponentScope, branch: Option<&str>) -> WidgetRequest {
        WidgetRequest {
            org_id: "o".to_string(),
            components,
            branch: branch.map(str::to_owned),
            ..Default::default()
        }
    }

    fn filters(out: &str, slot: &str) -> Vec<Value> {
        let v: Value = serde_json::from_str(out).unwrap();
        v["query"]["bool"][slot].as_array().unwrap().clone()
    }

    fn topology() -> InMemoryTopology {
        InMemoryTopology::from_nodes(vec![
            TopologyNode::new("b1", "main", NodeKind::Branch).with_children(&["a1", "a2", "a3"]),
            TopologyNode::new("a1", "build", NodeKind::Automation),
            TopologyNode::new("a2", "deploy", NodeKind::Automation).disabled(),
            TopologyNode::new("a3", "lint", NodeKind::Automation),
        ])
    }

    #[test]
    fn identity_scope_returns_input_bytes() {
        let req = request(ComponentScope::All, None);
        assert_eq!(rewrite(QUERY, &req, &RewriteMode::Default, None), QUERY);
        assert_eq!(rewrite(QUERY, &req, &RewriteMode::Sonar, None), QUERY);
    }

    #[test]
    fn default_appends_exactly_one_component_terms() {
        let req = request(
            ComponentScope::Only(vec!["c1".to_string(), "c2".to_string()]),
            Some("b1"),
        );
        let out = rewrite(QUERY, &req, &RewriteMode::Default, None);
        let list = filters(&out, "filter");
        let terms: Vec<_> = list
            .iter()
            .filter(|f| f.get("terms").and_then(|t| t.get("component_id")).is_some())
            .collect();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0]["terms"]["component_id"], json!(["c1", "c2"]));
        assert_eq!(list.len(), 2, "default mode ignores the branch");
    }

    #[test]
    fn drilldown_defaults_to_branch_id() {
        let req = request(ComponentScope::All, Some("b1"));
        let mode = RewriteMode::Drilldown {
            add_automations: false,
            add_branch_name: false,
        };
        let out = rewrite(QUERY, &req, &mode, None);
        assert_eq!(filters(&out, "filter")[1], json!({"term": {"branch_id": "b1"}}));
    }

    #[test]
    fn drilldown_resolves_active_automations() {
        let topo = topology();
        let req = request(ComponentScope::All, Some("b1"));
        let mode = RewriteMode::Drilldown {
            add_automations: true,
            add_branch_name: false,
        };
        let out = rewrite(QUERY, &req, &mode, Some(&topo));
        assert_eq!(
            filters(&out, "filter")[1],
            json!({"terms": {"automation_id": ["a1", "a3"]}})
        );
    }

    #[test]
    fn drilldown_resolves_branch_name() {
        let topo = topology();
        let req = request(ComponentScope::All, Some("b1"));
        let mode = RewriteMode::Drilldown {
            add_automations: false,
            add_branch_name: true,
        };
        let out = rewrite(QUERY, &req, &mode, Some(&topo));
        assert_eq!(filters(&out, "filter")[1], json!({"term": {"branch": "main"}}));
    }

    #[test]
    fn unresolvable_branch_name_is_omitted() {
        let topo = topology();
        let req = request(ComponentScope::All, Some("ghost"));
        let mode = RewriteMode::Drilldown {
            add_automations: false,
            add_branch_name: true,
        };
        assert_eq!(rewrite(QUERY, &req, &mode, Some(&topo)), QUERY);
    }

    #[test]
    fn sonar_adds_github_branch() {
        let req = request(ComponentScope::Only(vec!["c1".to_string()]), Some("gh-7"));
        let out = rewrite(QUERY, &req, &RewriteMode::Sonar, None);
        let list = filters(&out, "filter");
        assert_eq!(list.len(), 3);
        assert_eq!(list[2], json!({"term": {"github_branch_id": "gh-7"}}));
    }

    #[test]
    fn must_mode_targets_must_array() {
        let req = request(ComponentScope::Only(vec!["c1".to_string()]), None);
        let mode = RewriteMode::Must {
            extra: vec![json!({"match_phrase_prefix": {"title": "fix"}})],
        };
        let out = rewrite(QUERY, &req, &mode, None);
        assert_eq!(filters(&out, "must").len(), 2);
        assert_eq!(filters(&out, "filter").len(), 1);
    }

    #[test]
    fn must_not_mode_excludes_clauses() {
        let req = request(ComponentScope::Only(vec!["c1".to_string()]), None);
        let mode = RewriteMode::MustNot {
            extra: vec![json!({"terms": {"job_id": ["j1"]}})],
        };
        let out = rewrite(QUERY, &req, &mode, None);
        assert_eq!(filters(&out, "must_not"), vec![json!({"terms": {"job_id": ["j1"]}})]);
        assert_eq!(filters(&out, "filter").len(), 2);
    }

    #[test]
    fn missing_skeleton_falls_back_to_input() {
        let req = request(ComponentScope::Only(vec!["c1".to_string()]), None);
        let no_must = r#"{"query":{"bool":{"filter":[]}}}"#;
        let mode = RewriteMode::Must { extra: vec![] };
        assert_eq!(rewrite(no_must, &req, &mode, None), no_must);
        assert_eq!(rewrite("not json", &req, &RewriteMode::Default, None), "not json");
    }
}
