use std::collections::HashSet;

use serde_json::Value;

use super::percent::donut_shares;
use super::raw::{aggregations, buckets, key_string, parse};
use super::shapes::{report_drill_down, to_value, Donut, DonutInfo, DonutSlice};
use crate::templates;
use insights_common::error::InsightsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Components,
    Automations,
    SecurityScans,
}

struct Labels {
    active: &'static str,
    inactive: &'static str,
    active_report: &'static str,
    inactive_report: &'static str,
}

impl StatusKind {
    pub fn handler_name(&self) -> &'static str {
        match self {
            StatusKind::Components => "componentsActivity",
            StatusKind::Automations => "automationsActivity",
            StatusKind::SecurityScans => "securityScanActivity",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            StatusKind::Components => templates::COMPONENTS_WITH_BUILDS,
            StatusKind::Automations => templates::AUTOMATIONS_WITH_RUNS,
            StatusKind::SecurityScans => templates::COMPONENTS_WITH_SCANS,
        }
    }

    fn distinct_agg(&self) -> &'static str {
        match self {
            StatusKind::Automations => "distinct_automation",
            _ => "distinct_component",
        }
    }

    fn labels(&self) -> Labels {
        match self {
            StatusKind::Components => Labels {
                active: "Active",
                inactive: "Inactive",
                active_report: "activeComponents",
                inactive_report: "inactiveComponents",
            },
            StatusKind::Automations => Labels {
                active: "Active",
                inactive: "Inactive",
                active_report: "activeAutomations",
                inactive_report: "inactiveAutomations",
            },
            StatusKind::SecurityScans => Labels {
                active: "Scanned",
                inactive: "Not scanned",
                active_report: "scannedComponents",
                inactive_report: "unscannedComponents",
            },
        }
    }
}

/// Active/inactive donut over the `scope` ids. Only ids of the scope count as
/// active; an empty scope has no donut.
pub fn status_donut(kind: StatusKind, scope: &[String], raw: &str) -> InsightsResult<Value> {
    if scope.is_empty() {
        return Ok(Value::Null);
    }
    let response = parse(raw)?;
    let seen: HashSet<String> = buckets(&aggregations(&response)[kind.distinct_agg()])
        .iter()
        .map(key_string)
        .collect();

    let active = scope.iter().filter(|id| seen.contains(*id)).count() as i64;
    let inactive = scope.len() as i64 - active;
    let shares = donut_shares(&[active, inactive]);
    let labels = kind.labels();

    to_value(&Donut {
        data: vec![
            DonutSlice {
                name: labels.active.to_string(),
                value: shares[0],
            },
            DonutSlice {
                name: labels.inactive.to_string(),
                value: shares[1],
            },
        ],
        info: vec![
            DonutInfo {
                title: labels.active.to_string(),
                value: active,
                drill_down: report_drill_down(labels.active_report, labels.active),
            },
            DonutInfo {
                title: labels.inactive.to_string(),
                value: inactive,
                drill_down: report_drill_down(labels.inactive_report, labels.inactive),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_of_two_components_active() {
        let raw = json!({"aggregations": {"distinct_component": {"buckets": [
            {"key": "C1", "doc_count": 9}
        ]}}})
        .to_string();
        let donut = status_donut(StatusKind::Components, &ids(&["C1", "C2"]), &raw).unwrap();

        assert_eq!(
            donut["data"],
            json!([{"name": "Active", "value": 50}, {"name": "Inactive", "value": 50}])
        );
        assert_eq!(donut["info"][0]["title"], "Active");
        assert_eq!(donut["info"][0]["value"], 1);
        assert_eq!(donut["info"][1]["value"], 1);
        assert_eq!(donut["info"][1]["drillDown"]["reportId"], "inactiveComponents");
    }

    #[test]
    fn ids_outside_scope_are_ignored() {
        let raw = json!({"aggregations": {"distinct_automation": {"buckets": [
            {"key": "a1", "doc_count": 1},
            {"key": "ghost", "doc_count": 1}
        ]}}})
        .to_string();
        let donut =
            status_donut(StatusKind::Automations, &ids(&["a1", "a2", "a3"]), &raw).unwrap();
        assert_eq!(donut["info"][0]["value"], 1);
        let sum: i64 = donut["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["value"].as_i64().unwrap())
            .sum();
        assert_eq!(sum, 100);
    }

    #[test]
    fn empty_scope_is_null() {
        let out = status_donut(StatusKind::SecurityScans, &[], "{}").unwrap();
        assert!(out.is_null());
    }
}
