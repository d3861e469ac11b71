//! Widget handlers: bind templates, rewrite scope filters, query, then shape.

pub mod activity;
pub mod compare;
pub mod drilldown;
pub mod flow;
pub mod page_base;
pub mod security;
pub mod sonar;
pub mod status;
pub mod test_overview;

use std::sync::Arc;

use crate::binder::Bindings;
use crate::context::WidgetContext;
use crate::dispatch::{PageBaseHandler, WidgetHandler};
use crate::request::WidgetRequest;
use crate::rewrite::{rewrite, RewriteMode};
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

/// `orgId`, `startTime` and `endTime` of the request.
pub(crate) fn base_bindings(request: &WidgetRequest) -> InsightsResult<Bindings> {
    Ok(Bindings::new()
        .with("orgId", request.effective_org_id()?)
        .with("startTime", request.start_time)
        .with("endTime", request.end_time))
}

pub(crate) fn prepare_query(
    ctx: &WidgetContext,
    template: &str,
    bindings: &Bindings,
    request: &WidgetRequest,
    mode: &RewriteMode,
) -> InsightsResult<String> {
    let bound = ctx.templates.bind(template, bindings)?;
    Ok(rewrite(&bound, request, mode, ctx.topology()))
}

pub(crate) async fn search(
    ctx: &WidgetContext,
    template: &str,
    bindings: &Bindings,
    request: &WidgetRequest,
    mode: &RewriteMode,
    alias: IndexAlias,
) -> InsightsResult<String> {
    let query = prepare_query(ctx, template, bindings, request, mode)?;
    tracing::debug!(template, alias = %alias, "searching datastore");
    ctx.datastore.search(&query, alias).await
}

pub fn builtin_handlers() -> Vec<Arc<dyn WidgetHandler>> {
    let mut handlers = Vec::new();
    handlers.extend(status::handlers());
    handlers.extend(sonar::handlers());
    handlers.extend(activity::handlers());
    handlers.extend(drilldown::handlers());
    handlers.extend(test_overview::handlers());
    handlers.extend(security::handlers());
    handlers.extend(flow::handlers());
    handlers.extend(compare::handlers());
    handlers
}

pub fn builtin_page_bases() -> Vec<Arc<dyn PageBaseHandler>> {
    page_base::handlers()
}
