use serde_json::Value;

use crate::context::WidgetContext;
use crate::dispatch::{HandlerRegistry, PageBase, PageBaseRegistry};
use crate::handlers::{builtin_handlers, builtin_page_bases};
use crate::request::WidgetRequest;
use insights_common::error::InsightsResult;

/// Resolves widget requests: looks up the handler by name and runs it against
/// the shared context.
pub struct WidgetEngine {
    handlers: HandlerRegistry,
    page_bases: PageBaseRegistry,
    context: WidgetContext,
}

impl WidgetEngine {
    /// Engine with every built-in handler registered. Fails on duplicate names.
    pub fn new(context: WidgetContext) -> InsightsResult<Self> {
        Ok(Self {
            handlers: HandlerRegistry::new(builtin_handlers())?,
            page_bases: PageBaseRegistry::new(builtin_page_bases())?,
            context,
        })
    }

    pub fn with_registries(
        handlers: HandlerRegistry,
        page_bases: PageBaseRegistry,
        context: WidgetContext,
    ) -> Self {
        Self {
            handlers,
            page_bases,
            context,
        }
    }

    pub async fn execute(
        &self,
        widget_id: &str,
        name: &str,
        request: &WidgetRequest,
    ) -> InsightsResult<Value> {
        let handler = self.handlers.get(name)?;
        let start = std::time::Instant::now();

        let result = handler.handle(widget_id, request, &self.context).await;

        let took_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(widget_id, handler = name, took_ms, "widget resolved"),
            Err(e) => tracing::warn!(
                widget_id,
                handler = name,
                took_ms,
                error = %e,
                "widget failed"
            ),
        }
        result
    }

    pub async fn page_base(
        &self,
        widget_id: &str,
        request: &WidgetRequest,
    ) -> InsightsResult<PageBase> {
        let handler = self.page_bases.get(widget_id)?;
        let start = std::time::Instant::now();
        let page = handler.handle(request, &self.context).await?;
        tracing::info!(
            widget_id,
            options = page.data.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "page base resolved"
        );
        Ok(page)
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.names()
    }

    pub fn page_base_ids(&self) -> Vec<&'static str> {
        self.page_bases.widget_ids()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::handlers::testing::{context, MockDatastore};
    use insights_common::error::InsightsError;
    use insights_datastore::IndexAlias;
    use serde_json::json;

    fn request() -> WidgetRequest {
        WidgetRequest {
            org_id: "org".to_string(),
            start_time: 1_704_067_200_000,
            end_time: 1_704_671_999_000,
            ..Default::default()
        }
    }

    #[test]
    fn builtin_catalog_registers_without_duplicates() {
        let engine = WidgetEngine::new(context(Arc::new(MockDatastore::default()), &[], None)).unwrap();
        let names = engine.handler_names();
        assert_eq!(names.len(), 40);
        for expected in [
            "componentsActivity",
            "commitTrends",
            "runsDrilldown",
            "testOverview",
            "cweTop25",
            "securityFindings",
            "flowDistribution",
            "compareCommits",
            "compareDeploymentFrequency",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(
            engine.page_base_ids(),
            vec!["builtComponents", "deployedEnvironments"]
        );
    }

    #[tokio::test]
    async fn unknown_handler_is_not_found() {
        let engine = WidgetEngine::new(context(Arc::new(MockDatastore::default()), &[], None)).unwrap();
        let err = engine.execute("w", "noSuchWidget", &request()).await.unwrap_err();
        assert!(matches!(err, InsightsError::HandlerNotFound(n) if n == "noSuchWidget"));
    }

    #[tokio::test]
    async fn unknown_page_base_is_not_found() {
        let engine = WidgetEngine::new(context(Arc::new(MockDatastore::default()), &[], None)).unwrap();
        let err = engine.page_base("nope", &request()).await.unwrap_err();
        assert_eq!(err.code(), "HANDLER_NOT_FOUND");
    }

    #[tokio::test]
    async fn datastore_failure_propagates() {
        let engine = WidgetEngine::new(context(Arc::new(MockDatastore::failing()), &[], None)).unwrap();
        let err = engine
            .execute("commitTrendsHeader", "commitTrends", &request())
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::Datastore(_)));
    }

    #[tokio::test]
    async fn executes_through_registry() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::DeployData,
            json!({"aggregations": {"environments": {"buckets": [{"key": "qa", "doc_count": 2}]}}}),
        ));
        let engine = WidgetEngine::new(context(store, &[], None)).unwrap();
        let page = engine.page_base("deployedEnvironments", &request()).await.unwrap();
        assert_eq!(page.data, vec!["qa"]);
    }
}
