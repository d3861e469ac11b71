use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{base_bindings, search};
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::activity::ActivityKind;
use crate::postprocess::Raws;
use crate::request::{Granularity, WidgetRequest};
use crate::rewrite::RewriteMode;
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

/// Commits, workflow runs, builds, deployments and pull requests over time.
pub struct ActivityHandler {
    kind: ActivityKind,
}

impl ActivityHandler {
    fn alias(&self) -> IndexAlias {
        match self.kind {
            ActivityKind::Commits => IndexAlias::CommitData,
            ActivityKind::WorkflowRuns => IndexAlias::AutomationMetadata,
            ActivityKind::Builds => IndexAlias::BuildData,
            ActivityKind::Deployments => IndexAlias::DeployData,
            ActivityKind::PullRequests => IndexAlias::PullRequestData,
        }
    }

    fn mode(&self, request: &WidgetRequest) -> RewriteMode {
        match self.kind {
            ActivityKind::Commits => RewriteMode::Must {
                extra: request
                    .flag("commitTitle")
                    .map(|title| vec![json!({"match_phrase_prefix": {"title": title}})])
                    .unwrap_or_default(),
            },
            ActivityKind::WorkflowRuns => {
                let excluded: Vec<&str> = request
                    .flag("excludedJobIds")
                    .map(|ids| ids.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
                    .unwrap_or_default();
                RewriteMode::MustNot {
                    extra: if excluded.is_empty() {
                        Vec::new()
                    } else {
                        vec![json!({"terms": {"job_id": excluded}})]
                    },
                }
            }
            _ => RewriteMode::Default,
        }
    }

    /// Charts need an explicit histogram interval; headers only read totals.
    fn granularity(&self, widget_id: &str, request: &WidgetRequest) -> InsightsResult<Granularity> {
        if widget_id.ends_with("Chart") {
            request.require_granularity()
        } else {
            Ok(request.aggregation.unwrap_or(Granularity::Week))
        }
    }
}

#[async_trait]
impl WidgetHandler for ActivityHandler {
    fn name(&self) -> &'static str {
        self.kind.handler_name()
    }

    async fn handle(
        &self,
        widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let granularity = self.granularity(widget_id, request)?;
        let bindings = base_bindings(request)?.with("interval", granularity.calendar_interval());
        let template = self.kind.template();

        let raw = search(ctx, template, &bindings, request, &self.mode(request), self.alias()).await?;
        let raws = Raws::from([(template.to_string(), raw)]);
        ctx.post_processors
            .run(self.kind.handler_name(), widget_id, &raws, request)
    }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    [
        ActivityKind::Commits,
        ActivityKind::WorkflowRuns,
        ActivityKind::Builds,
        ActivityKind::Deployments,
        ActivityKind::PullRequests,
    ]
    .into_iter()
    .map(|kind| Arc::new(ActivityHandler { kind }) as Arc<dyn WidgetHandler>)
    .collect()
}
