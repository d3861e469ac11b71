use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{base_bindings, search};
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::test_overview::{alias, template, test_overview};
use crate::request::{ViewOption, WidgetRequest};
use crate::resolver::component_automation_map;
use crate::rewrite::RewriteMode;
use insights_common::error::InsightsResult;

/// Test health per suite, component or test case depending on `viewOption`.
pub struct TestOverviewHandler;

#[async_trait]
impl WidgetHandler for TestOverviewHandler {
    fn name(&self) -> &'static str {
        "testOverview"
    }

    async fn handle(
        &self,
        widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let view = request.view_option.unwrap_or(ViewOption::TestSuite);

        if view == ViewOption::TestSuite {
            // Resolved but not surfaced in the rows yet.
            let automation_map =
                component_automation_map(ctx.topology(), request.components.ids().unwrap_or(&[]));
            tracing::debug!(
                widget_id,
                components = automation_map.len(),
                "resolved component automations"
            );
        }

        let raw = search(
            ctx,
            template(view),
            &base_bindings(request)?,
            request,
            &RewriteMode::Default,
            alias(view),
        )
        .await?;
        test_overview(view, &raw)
    }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    vec![Arc::new(TestOverviewHandler)]
}
