use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{base_bindings, search};
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::raw::{hit_sources, parse};
use crate::request::WidgetRequest;
use crate::rewrite::RewriteMode;
use crate::templates;
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

/// Detail rows behind a chart point, scoped to one branch.
pub struct DrilldownHandler {
    name: &'static str,
    template: &'static str,
    alias: IndexAlias,
    add_automations: bool,
    add_branch_name: bool,
}

impl DrilldownHandler {
    fn mode(&self, request: &WidgetRequest) -> RewriteMode {
        let by_name = request
            .flag("addBranchName")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        RewriteMode::Drilldown {
            add_automations: self.add_automations,
            add_branch_name: self.add_branch_name || by_name,
        }
    }
}

#[async_trait]
impl WidgetHandler for DrilldownHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(
        &self,
        _widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let raw = search(
            ctx,
            self.template,
            &base_bindings(request)?,
            request,
            &self.mode(request),
            self.alias,
        )
        .await?;
        let rows = hit_sources(&parse(&raw)?);
        if rows.is_empty() {
            return Ok(Value::Null);
        }
        Ok(Value::Array(rows))
    }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    vec![
        Arc::new(DrilldownHandler {
            name: "runsDrilldown",
            template: templates::RUNS_LIST,
            alias: IndexAlias::AutomationMetadata,
            add_automations: true,
            add_branch_name: false,
        }),
        Arc::new(DrilldownHandler {
            name: "commitsDrilldown",
            template: templates::COMMITS_LIST,
            alias: IndexAlias::CommitData,
            add_automations: false,
            add_branch_name: true,
        }),
        Arc::new(DrilldownHandler {
            name: "buildsDrilldown",
            template: templates::BUILDS_LIST,
            alias: IndexAlias::BuildData,
            add_automations: false,
            add_branch_name: false,
        }),
    ]
}
