use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{base_bindings, search};
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::status::{status_donut, StatusKind};
use crate::request::WidgetRequest;
use crate::resolver::{active_automations, components_in_scope};
use crate::rewrite::RewriteMode;
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

/// Active/inactive donut of components, automations or scanned components.
pub struct StatusHandler {
    kind: StatusKind,
}

impl StatusHandler {
    fn alias(&self) -> IndexAlias {
        match self.kind {
            StatusKind::Components => IndexAlias::BuildData,
            StatusKind::Automations => IndexAlias::AutomationMetadata,
            StatusKind::SecurityScans => IndexAlias::RawScanResults,
        }
    }

    async fn scope(&self, request: &WidgetRequest, ctx: &WidgetContext) -> InsightsResult<Vec<String>> {
        let org_id = request.effective_org_id()?;
        let services = ctx.directory.organisation_services(org_id).await?.service;
        Ok(match self.kind {
            StatusKind::Automations => active_automations(
                ctx.topology(),
                &services,
                &request.components,
                request.branch(),
            ),
            _ => components_in_scope(ctx.topology(), &services, &request.components)
                .into_iter()
                .map(|s| s.id.clone())
                .collect(),
        })
    }
}

#[async_trait]
impl WidgetHandler for StatusHandler {
    fn name(&self) -> &'static str {
        self.kind.handler_name()
    }

    async fn handle(
        &self,
        _widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let scope = self.scope(request, ctx).await?;
        if scope.is_empty() {
            return Ok(Value::Null);
        }
        let raw = search(
            ctx,
            self.kind.template(),
            &base_bindings(request)?,
            request,
            &RewriteMode::Default,
            self.alias(),
        )
        .await?;
        status_donut(self.kind, &scope, &raw)
    }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    [
        StatusKind::Components,
        StatusKind::Automations,
        StatusKind::SecurityScans,
    ]
    .into_iter()
    .map(|kind| Arc::new(StatusHandler { kind }) as Arc<dyn WidgetHandler>)
    .collect()
}
