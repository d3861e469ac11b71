use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{base_bindings, prepare_query, search};
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::security::{cwe_top_25, OPEN_KEY, REMEDIATED_KEY};
use crate::request::WidgetRequest;
use crate::rewrite::RewriteMode;
use crate::templates;
use insights_common::error::InsightsResult;
use insights_datastore::{IndexAlias, SearchRequest};

pub struct CweTop25Handler;

#[async_trait]
impl WidgetHandler for CweTop25Handler {
    fn name(&self) -> &'static str {
        "cweTop25"
    }

    async fn handle(
        &self,
        _widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let raw = search(
            ctx,
            templates::CWE_TOP_25,
            &base_bindings(request)?,
            request,
            &RewriteMode::Default,
            IndexAlias::SecurityFindings,
        )
        .await?;
        cwe_top_25(&raw)
    }
}

/// Open and remediated findings fetched in one keyed multi-search.
pub struct SecurityFindingsHandler;

#[async_trait]
impl WidgetHandler for SecurityFindingsHandler {
    fn name(&self) -> &'static str {
        "securityFindings"
    }

    async fn handle(
        &self,
        widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let bindings = base_bindings(request)?;
        let mut batch = HashMap::new();
        for key in [OPEN_KEY, REMEDIATED_KEY] {
            let query = prepare_query(ctx, key, &bindings, request, &RewriteMode::Default)?;
            batch.insert(
                key.to_string(),
                SearchRequest::new(IndexAlias::SecurityFindings, query),
            );
        }

        let raws = ctx.datastore.multi_search(batch).await?;
        ctx.post_processors
            .run(self.name(), widget_id, &raws, request)
    }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    vec![
        Arc::new(CweTop25Handler) as Arc<dyn WidgetHandler>,
        Arc::new(SecurityFindingsHandler),
    ]
}
