//! Named datastore query templates. Every template carries a `query.bool`
//! skeleton the filter rewriter appends to.

pub mod activity;
pub mod drilldown;
pub mod metrics;
pub mod page_base;
pub mod quality;
pub mod security;
pub mod sonar;
pub mod status;

use std::collections::HashMap;

use crate::binder::{bind, Bindings};
use insights_common::error::{InsightsError, InsightsResult};

pub const COMPONENTS_WITH_BUILDS: &str = "componentsWithBuilds";
pub const AUTOMATIONS_WITH_RUNS: &str = "automationsWithRuns";
pub const COMPONENTS_WITH_SCANS: &str = "componentsWithScans";
pub const LATEST_SCAN_REPORTS: &str = "latestScanReports";
pub const COMMIT_TRENDS: &str = "commitTrends";
pub const WORKFLOW_RUNS: &str = "workflowRuns";
pub const BUILDS: &str = "builds";
pub const DEPLOYMENTS: &str = "deployments";
pub const PULL_REQUESTS: &str = "pullRequests";
pub const RUNS_LIST: &str = "runsList";
pub const COMMITS_LIST: &str = "commitsList";
pub const BUILDS_LIST: &str = "buildsList";
pub const TEST_SUITE_OVERVIEW: &str = "testSuiteOverview";
pub const COMPONENT_TEST_OVERVIEW: &str = "componentTestOverview";
pub const TEST_CASE_OVERVIEW: &str = "testCaseOverview";
pub const CWE_TOP_25: &str = "cweTop25";
pub const OPEN_BY_SEVERITY: &str = "openBySeverity";
pub const REMEDIATED_BY_SEVERITY: &str = "remediatedBySeverity";
pub const SCOPED_METRICS: &str = "scopedMetrics";
pub const METRICS_BY_COMPONENT: &str = "metricsByComponent";
pub const DEPLOYED_ENVIRONMENTS: &str = "deployedEnvironments";
pub const BUILT_COMPONENTS: &str = "builtComponents";

const BUILTIN: &[(&str, &str)] = &[
    (COMPONENTS_WITH_BUILDS, status::COMPONENTS_WITH_BUILDS),
    (AUTOMATIONS_WITH_RUNS, status::AUTOMATIONS_WITH_RUNS),
    (COMPONENTS_WITH_SCANS, status::COMPONENTS_WITH_SCANS),
    (LATEST_SCAN_REPORTS, sonar::LATEST_SCAN_REPORTS),
    (COMMIT_TRENDS, activity::COMMIT_TRENDS),
    (WORKFLOW_RUNS, activity::WORKFLOW_RUNS),
    (BUILDS, activity::BUILDS),
    (DEPLOYMENTS, activity::DEPLOYMENTS),
    (PULL_REQUESTS, activity::PULL_REQUESTS),
    (RUNS_LIST, drilldown::RUNS_LIST),
    (COMMITS_LIST, drilldown::COMMITS_LIST),
    (BUILDS_LIST, drilldown::BUILDS_LIST),
    (TEST_SUITE_OVERVIEW, quality::TEST_SUITE_OVERVIEW),
    (COMPONENT_TEST_OVERVIEW, quality::COMPONENT_TEST_OVERVIEW),
    (TEST_CASE_OVERVIEW, quality::TEST_CASE_OVERVIEW),
    (CWE_TOP_25, security::CWE_TOP_25),
    (OPEN_BY_SEVERITY, security::OPEN_BY_SEVERITY),
    (REMEDIATED_BY_SEVERITY, security::REMEDIATED_BY_SEVERITY),
    (SCOPED_METRICS, metrics::SCOPED_METRICS),
    (METRICS_BY_COMPONENT, metrics::METRICS_BY_COMPONENT),
    (DEPLOYED_ENVIRONMENTS, page_base::DEPLOYED_ENVIRONMENTS),
    (BUILT_COMPONENTS, page_base::BUILT_COMPONENTS),
];

/// Immutable template registry shared by every request.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: HashMap<&'static str, &'static str>,
}

impl TemplateStore {
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN.iter().copied().collect(),
        }
    }

    pub fn get(&self, name: &str) -> InsightsResult<&'static str> {
        self.templates
            .get(name)
            .copied()
            .ok_or_else(|| InsightsError::TemplateNotFound(name.to_owned()))
    }

    pub fn bind(&self, name: &str, bindings: &Bindings) -> InsightsResult<String> {
        bind(name, self.get(name)?, bindings)
    }

    pub fn names(&self) -> impl Iterator<Item = &&'static str> {
        self.templates.keys()
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{placeholders, BindValue};
    use serde_json::Value;

    fn full_bindings() -> Bindings {
        Bindings::new()
            .with("orgId", "org-1")
            .with("startTime", 1_704_067_200_000i64)
            .with("endTime", 1_706_745_599_000i64)
            .with("interval", "week")
            .with("size", 2i64)
            .with("metricAggs", BindValue::Raw(metrics::CYCLE_TIME.to_owned()))
    }

    #[test]
    fn names_are_unique() {
        let store = TemplateStore::builtin();
        assert_eq!(store.names().count(), BUILTIN.len());
    }

    #[test]
    fn every_template_binds_to_json_with_a_bool_query() {
        let store = TemplateStore::builtin();
        for name in store.names() {
            let bound = store.bind(name, &full_bindings()).unwrap();
            assert!(placeholders(&bound).is_empty(), "{name} left a placeholder");
            let parsed: Value = serde_json::from_str(&bound)
                .unwrap_or_else(|e| panic!("{name} is not JSON after binding: {e}"));
            assert!(
                parsed["query"]["bool"].is_object(),
                "{name} lacks query.bool"
            );
        }
    }

    #[test]
    fn metric_fragments_are_json_objects() {
        for fragment in [
            metrics::COUNT_COMMITS,
            metrics::COUNT_RUNS,
            metrics::COUNT_BUILDS,
            metrics::COUNT_DEPLOYMENTS,
            metrics::PR_STATUS,
            metrics::OPEN_SEVERITY,
            metrics::WORKLOAD_KIND,
            metrics::CYCLE_TIME,
            metrics::DEV_CYCLE_TIME,
            metrics::RECOVERY_TIME,
            metrics::LEAD_TIME,
            metrics::FLOW_TIME,
            metrics::RUN_FAILURES,
        ] {
            let parsed: Value = serde_json::from_str(fragment).unwrap();
            assert!(parsed.is_object());
        }
    }

    #[test]
    fn unknown_template_is_reported() {
        let store = TemplateStore::builtin();
        assert!(matches!(
            store.get("nope"),
            Err(InsightsError::TemplateNotFound(_))
        ));
    }
}
