use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{base_bindings, search};
use crate::binder::BindValue;
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::flow::{deployment_frequency, flow_distribution, flow_efficiency, mttr};
use crate::postprocess::Raws;
use crate::request::WidgetRequest;
use crate::rewrite::RewriteMode;
use crate::templates::{self, metrics};
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Distribution,
    CycleTime,
    Mttr,
    DeploymentFrequency,
    Efficiency,
}

impl FlowKind {
    fn name(&self) -> &'static str {
        match self {
            FlowKind::Distribution => "flowDistribution",
            FlowKind::CycleTime => "cycleTime",
            FlowKind::Mttr => "mttr",
            FlowKind::DeploymentFrequency => "deploymentFrequency",
            FlowKind::Efficiency => "flowEfficiency",
        }
    }

    fn source(&self) -> (IndexAlias, &'static str) {
        match self {
            FlowKind::Distribution => (IndexAlias::FlowItems, metrics::WORKLOAD_KIND),
            FlowKind::CycleTime => (IndexAlias::PullRequestData, metrics::CYCLE_TIME),
            FlowKind::Mttr => (IndexAlias::IncidentData, metrics::RECOVERY_TIME),
            FlowKind::DeploymentFrequency => (IndexAlias::DeployData, metrics::COUNT_DEPLOYMENTS),
            FlowKind::Efficiency => (IndexAlias::FlowItems, metrics::FLOW_TIME),
        }
    }
}

/// Scope-wide flow and DORA metrics read from one `scopedMetrics` query.
pub struct FlowHandler {
    kind: FlowKind,
}

#[async_trait]
impl WidgetHandler for FlowHandler {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    async fn handle(
        &self,
        widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let (alias, fragment) = self.kind.source();
        let bindings =
            base_bindings(request)?.with("metricAggs", BindValue::Raw(fragment.to_string()));
        let raw = search(
            ctx,
            templates::SCOPED_METRICS,
            &bindings,
            request,
            &RewriteMode::Default,
            alias,
        )
        .await?;

        match self.kind {
            FlowKind::Distribution => flow_distribution(&raw),
            FlowKind::CycleTime => {
                let raws = Raws::from([(templates::SCOPED_METRICS.to_string(), raw)]);
                ctx.post_processors
                    .run(self.kind.name(), widget_id, &raws, request)
            }
            FlowKind::Mttr => mttr(&raw),
            FlowKind::DeploymentFrequency => deployment_frequency(&raw, request.window_days()),
            FlowKind::Efficiency => flow_efficiency(&raw),
        }
    }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    [
        FlowKind::Distribution,
        FlowKind::CycleTime,
        FlowKind::Mttr,
        FlowKind::DeploymentFrequency,
        FlowKind::Efficiency,
    ]
    .into_iter()
    .map(|kind| Arc::new(FlowHandler { kind }) as Arc<dyn WidgetHandler>)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{context, MockDatastore};
    use serde_json::json;

    const DAY: i64 = 86_400_000;
    const START: i64 = 1_704_067_200_000;

    fn request() -> WidgetRequest {
        WidgetRequest {
            org_id: "o".to_string(),
            start_time: START,
            end_time: START + 7 * DAY - 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn deployment_frequency_over_the_window() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::DeployData,
            json!({"aggregations": {"value": {"value": 14}}}),
        ));
        let ctx = context(store.clone(), &[], None);
        let handler = FlowHandler {
            kind: FlowKind::DeploymentFrequency,
        };
        let out = handler.handle("deploymentFrequency", &request(), &ctx).await.unwrap();
        assert_eq!(out, json!({"value": 2.0, "differenceInDays": 7}));

        let q: Value = serde_json::from_str(&store.queries()[0].1).unwrap();
        assert_eq!(q["aggs"]["value"]["value_count"]["field"], "deployment_id");
    }

    #[tokio::test]
    async fn cycle_time_routes_through_registry() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::PullRequestData,
            json!({"aggregations": {
                "items": {"value": 2},
                "coding": {"value": 7_200_000},
                "pickup": {"value": 0},
                "review": {"value": 0},
                "deploy": {"value": 0}
            }}),
        ));
        let ctx = context(store, &[], None);
        let handler = FlowHandler {
            kind: FlowKind::CycleTime,
        };
        let header = handler.handle("cycleTimeHeader", &request(), &ctx).await.unwrap();
        assert_eq!(header, json!({"value": "1h 0m", "valueInMillis": 3_600_000}));
    }

    #[tokio::test]
    async fn empty_distribution_is_null() {
        let ctx = context(Arc::new(MockDatastore::default()), &[], None);
        let handler = FlowHandler {
            kind: FlowKind::Distribution,
        };
        let out = handler.handle("flowDistribution", &request(), &ctx).await.unwrap();
        assert!(out.is_null());
    }
}
