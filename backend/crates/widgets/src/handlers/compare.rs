use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{base_bindings, search};
use crate::binder::BindValue;
use crate::compare::rollup::RatioKind;
use crate::compare::{
    build_organization, compare, CountRollup, DistributionRollup, DoraFrequencyRollup,
    Organization, RatioRollup, Rollup, TimeAverageRollup, TimeBreakdownRollup,
};
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::activity::PR_STATUSES;
use crate::postprocess::flow::{CYCLE_STAGES, DEV_CYCLE_STAGES, WORKLOAD_KINDS};
use crate::postprocess::raw::{aggregations, buckets, key_string, parse};
use crate::postprocess::security::SEVERITY_CATEGORIES;
use crate::postprocess::shapes::to_value;
use crate::request::WidgetRequest;
use crate::resolver::component_automation_map;
use crate::rewrite::RewriteMode;
use crate::templates::{self, metrics};
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

/// Where per-component values come from.
#[derive(Debug, Clone, Copy)]
pub enum MetricSource {
    /// One `metricsByComponent` terms aggregation with this fragment.
    Datastore {
        alias: IndexAlias,
        fragment: &'static str,
    },
    /// Active automations per component, straight from the topology.
    Topology,
}

/// One comparison widget: a metric source reduced over the org tree.
pub struct CompareHandler<R> {
    name: &'static str,
    source: MetricSource,
    rollup: R,
}

impl<R: Rollup> CompareHandler<R> {
    async fn leaves(
        &self,
        org: &Organization,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<HashMap<String, R::Acc>> {
        let window = request.window_days();
        let ids = org.component_ids();

        let per_component: HashMap<String, Value> = match self.source {
            MetricSource::Datastore { alias, fragment } => {
                let bindings = base_bindings(request)?
                    .with("metricAggs", BindValue::Raw(fragment.to_string()));
                let raw = search(
                    ctx,
                    templates::METRICS_BY_COMPONENT,
                    &bindings,
                    request,
                    &RewriteMode::Default,
                    alias,
                )
                .await?;
                let response = parse(&raw)?;
                buckets(&aggregations(&response)["by_component"])
                    .iter()
                    .map(|b| (key_string(b), b.clone()))
                    .collect()
            }
            MetricSource::Topology => component_automation_map(ctx.topology(), &ids)
                .into_iter()
                .map(|(id, automations)| (id, json!({"value": {"value": automations.len()}})))
                .collect(),
        };

        Ok(ids
            .into_iter()
            .map(|id| {
                let acc = self.rollup.leaf(per_component.get(&id), window);
                (id, acc)
            })
            .collect())
    }
}

#[async_trait]
impl<R: Rollup + 'static> WidgetHandler for CompareHandler<R> {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(
        &self,
        widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let org_id = request.effective_org_id()?;
        let org = build_organization(ctx.topology(), org_id);
        let leaves = self.leaves(&org, request, ctx).await?;
        tracing::debug!(
            widget_id,
            handler = self.name,
            components = leaves.len(),
            "comparison leaves resolved"
        );
        to_value(&compare(&self.rollup, &org, &leaves))
    }
}

fn handler<R: Rollup + 'static>(
    name: &'static str,
    source: MetricSource,
    rollup: R,
) -> Arc<dyn WidgetHandler> {
    Arc::new(CompareHandler {
        name,
        source,
        rollup,
    })
}

fn datastore(alias: IndexAlias, fragment: &'static str) -> MetricSource {
    MetricSource::Datastore { alias, fragment }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    use IndexAlias::*;

    vec![
        handler(
            "compareCommits",
            datastore(CommitData, metrics::COUNT_COMMITS),
            CountRollup::new("Commits"),
        ),
        handler(
            "compareWorkflowRuns",
            datastore(AutomationMetadata, metrics::COUNT_RUNS),
            CountRollup::new("Workflow runs"),
        ),
        handler(
            "compareBuilds",
            datastore(BuildData, metrics::COUNT_BUILDS),
            CountRollup::new("Builds"),
        ),
        handler(
            "compareDeployments",
            datastore(DeployData, metrics::COUNT_DEPLOYMENTS),
            CountRollup::new("Deployments"),
        ),
        handler(
            "compareComponents",
            datastore(BuildData, metrics::COUNT_BUILDS),
            CountRollup::presence("Active components"),
        ),
        handler(
            "compareWorkflows",
            MetricSource::Topology,
            CountRollup::new("Workflows"),
        ),
        handler(
            "comparePullRequests",
            datastore(PullRequestData, metrics::PR_STATUS),
            DistributionRollup::new(&["status"], &PR_STATUSES),
        ),
        handler(
            "compareVulnerabilities",
            datastore(SecurityFindings, metrics::OPEN_SEVERITY),
            DistributionRollup::new(&["status", "severity"], &SEVERITY_CATEGORIES),
        ),
        handler(
            "compareFlowDistribution",
            datastore(FlowItems, metrics::WORKLOAD_KIND),
            DistributionRollup::new(&["kind"], &WORKLOAD_KINDS),
        ),
        handler(
            "compareCycleTime",
            datastore(PullRequestData, metrics::CYCLE_TIME),
            TimeBreakdownRollup::new(&CYCLE_STAGES),
        ),
        handler(
            "compareDevCycleTime",
            datastore(FlowItems, metrics::DEV_CYCLE_TIME),
            TimeBreakdownRollup::new(&DEV_CYCLE_STAGES),
        ),
        handler(
            "compareMttr",
            datastore(IncidentData, metrics::RECOVERY_TIME),
            TimeAverageRollup::new("Mean time to recovery"),
        ),
        handler(
            "compareLeadTime",
            datastore(DeployData, metrics::LEAD_TIME),
            TimeAverageRollup::new("Lead time"),
        ),
        handler(
            "compareFlowEfficiency",
            datastore(FlowItems, metrics::FLOW_TIME),
            RatioRollup::new("Flow efficiency", RatioKind::FlowEfficiency),
        ),
        handler(
            "compareWaitTime",
            datastore(FlowItems, metrics::FLOW_TIME),
            RatioRollup::new("Wait time", RatioKind::WaitTime),
        ),
        handler(
            "compareFailureRate",
            datastore(AutomationMetadata, metrics::RUN_FAILURES),
            RatioRollup::new("Failure rate", RatioKind::FailureRate),
        ),
        handler(
            "compareDeploymentFrequency",
            datastore(DeployData, metrics::COUNT_DEPLOYMENTS),
            DoraFrequencyRollup,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{context, MockDatastore};
    use insights_topology::{InMemoryTopology, NodeKind, TopologyCache, TopologyNode};

    fn topology() -> Arc<dyn TopologyCache> {
        Arc::new(InMemoryTopology::from_nodes(vec![
            TopologyNode::new("org", "Acme", NodeKind::Organization)
                .with_children(&["C1", "C2", "sub"]),
            TopologyNode::new("sub", "Payments", NodeKind::Organization).with_children(&["C3"]),
            TopologyNode::new("C1", "api", NodeKind::Component).with_children(&["b1"]),
            TopologyNode::new("C2", "web", NodeKind::Component),
            TopologyNode::new("C3", "ledger", NodeKind::Component),
            TopologyNode::new("b1", "main", NodeKind::Branch).with_children(&["a1", "a2"]),
            TopologyNode::new("a1", "ci", NodeKind::Automation),
            TopologyNode::new("a2", "cd", NodeKind::Automation),
        ]))
    }

    fn request() -> WidgetRequest {
        WidgetRequest {
            org_id: "org".to_string(),
            start_time: 1_704_067_200_000,
            end_time: 1_704_671_999_000,
            ..Default::default()
        }
    }

    fn find(name: &str) -> Arc<dyn WidgetHandler> {
        handlers().into_iter().find(|h| h.name() == name).unwrap()
    }

    #[test]
    fn seventeen_distinct_handlers() {
        let mut names: Vec<_> = handlers().iter().map(|h| h.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 17);
    }

    #[tokio::test]
    async fn velocity_compare_sums_components() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::FlowItems,
            json!({"aggregations": {"by_component": {"buckets": [
                {"key": "C1", "doc_count": 4, "kind": {"buckets": [
                    {"key": "BUG", "doc_count": 3}, {"key": "FEATURE", "doc_count": 1}
                ]}},
                {"key": "C2", "doc_count": 4, "kind": {"buckets": [
                    {"key": "FEATURE", "doc_count": 4}
                ]}}
            ]}}}),
        ));
        let ctx = context(store, &[], Some(topology()));

        let out = find("compareFlowDistribution")
            .handle("compareFlowDistribution", &request(), &ctx)
            .await
            .unwrap();

        assert_eq!(
            out["section"]["data"],
            json!([
                {"title": "Bugs", "value": 3},
                {"title": "Feature", "value": 5},
                {"title": "Risk", "value": 0},
                {"title": "Tech debt", "value": 0}
            ])
        );
        assert_eq!(out["totalValue"], 8);
        assert_eq!(out["componentsCount"], 3);
        // C3 sits in the sub-org without data
        assert_eq!(out["compareReports"][2]["isSubOrg"], true);
        assert_eq!(out["compareReports"][2]["totalValue"], 0);
        assert_eq!(out["compareReports"][2]["compareReports"][0]["title"], "ledger");
    }

    #[tokio::test]
    async fn workflows_come_from_topology_only() {
        let store = Arc::new(MockDatastore::default());
        let ctx = context(store.clone(), &[], Some(topology()));
        let out = find("compareWorkflows")
            .handle("compareWorkflows", &request(), &ctx)
            .await
            .unwrap();
        assert_eq!(out["totalValue"], 2);
        assert_eq!(out["compareReports"][0]["totalValue"], 2);
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn deployment_frequency_inherits_window_days() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::DeployData,
            json!({"aggregations": {"by_component": {"buckets": [
                {"key": "C1", "doc_count": 7, "value": {"value": 7}},
                {"key": "C3", "doc_count": 7, "value": {"value": 7}}
            ]}}}),
        ));
        let ctx = context(store, &[], Some(topology()));
        let out = find("compareDeploymentFrequency")
            .handle("compareDeploymentFrequency", &request(), &ctx)
            .await
            .unwrap();
        assert_eq!(out["differenceInDays"], 7);
        assert_eq!(out["totalValue"], 2.0);
        assert_eq!(out["compareReports"][1]["totalValue"], 0.0);
    }

    #[tokio::test]
    async fn missing_org_is_invalid_argument() {
        let ctx = context(Arc::new(MockDatastore::default()), &[], Some(topology()));
        let err = find("compareCommits")
            .handle("compareCommits", &WidgetRequest::default(), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn absent_topology_gives_empty_tree() {
        let ctx = context(Arc::new(MockDatastore::default()), &[], None);
        let out = find("compareBuilds")
            .handle("compareBuilds", &request(), &ctx)
            .await
            .unwrap();
        assert_eq!(out["id"], "org");
        assert_eq!(out["totalValue"], 0);
        assert_eq!(out["compareReports"], json!([]));
    }
}
