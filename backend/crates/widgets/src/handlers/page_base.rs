use std::sync::Arc;

use async_trait::async_trait;

use super::{base_bindings, search};
use crate::context::WidgetContext;
use crate::dispatch::{PageBase, PageBaseHandler};
use crate::postprocess::raw::{aggregations, buckets, first_term, key_string, parse, term_counts};
use crate::request::WidgetRequest;
use crate::rewrite::RewriteMode;
use crate::templates;
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

/// Environments deployed to in the window, with their deployment counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployedEnvironmentsHandler;

#[async_trait]
impl PageBaseHandler for DeployedEnvironmentsHandler {
    fn widget_id(&self) -> &'static str {
        "deployedEnvironments"
    }

    async fn handle(&self, request: &WidgetRequest, ctx: &WidgetContext) -> InsightsResult<PageBase> {
        let raw = search(
            ctx,
            templates::DEPLOYED_ENVIRONMENTS,
            &base_bindings(request)?,
            request,
            &RewriteMode::Must { extra: Vec::new() },
            IndexAlias::DeployData,
        )
        .await?;
        let response = parse(&raw)?;

        let mut page = PageBase::default();
        for (env, count) in term_counts(&aggregations(&response)["environments"]) {
            page.data.push(env.clone());
            page.aux.insert(env, count.to_string());
        }
        page.data.sort();
        page.data.dedup();
        Ok(page)
    }
}

/// Components with at least one build in the window, id to display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltComponentsHandler;

#[async_trait]
impl PageBaseHandler for BuiltComponentsHandler {
    fn widget_id(&self) -> &'static str {
        "builtComponents"
    }

    async fn handle(&self, request: &WidgetRequest, ctx: &WidgetContext) -> InsightsResult<PageBase> {
        let raw = search(
            ctx,
            templates::BUILT_COMPONENTS,
            &base_bindings(request)?,
            request,
            &RewriteMode::Default,
            IndexAlias::BuildData,
        )
        .await?;
        let response = parse(&raw)?;

        let mut page = PageBase::default();
        for bucket in buckets(&aggregations(&response)["distinct_component"]) {
            let id = key_string(bucket);
            let name = first_term(bucket, "component_name").unwrap_or_else(|| id.clone());
            page.data.push(id.clone());
            page.aux.insert(id, name);
        }
        page.data.sort();
        page.data.dedup();
        Ok(page)
    }
}

pub fn handlers() -> Vec<Arc<dyn PageBaseHandler>> {
    vec![
        Arc::new(DeployedEnvironmentsHandler) as Arc<dyn PageBaseHandler>,
        Arc::new(BuiltComponentsHandler),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{context, MockDatastore};
    use serde_json::json;

    fn request() -> WidgetRequest {
        WidgetRequest {
            org_id: "org".to_string(),
            start_time: 1_704_067_200_000,
            end_time: 1_704_671_999_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn environments_sorted_with_counts() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::DeployData,
            json!({"aggregations": {"environments": {"buckets": [
                {"key": "prod", "doc_count": 12},
                {"key": "dev", "doc_count": 40}
            ]}}}),
        ));
        let ctx = context(store.clone(), &[], None);

        let page = DeployedEnvironmentsHandler.handle(&request(), &ctx).await.unwrap();

        assert_eq!(page.data, vec!["dev", "prod"]);
        assert_eq!(page.aux["prod"], "12");
        assert_eq!(page.aux["dev"], "40");
        let queries = store.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].0, IndexAlias::DeployData);
    }

    #[tokio::test]
    async fn built_components_fall_back_to_id_for_name() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::BuildData,
            json!({"aggregations": {"distinct_component": {"buckets": [
                {"key": "c2", "doc_count": 3, "component_name": {"buckets": [{"key": "web", "doc_count": 3}]}},
                {"key": "c1", "doc_count": 1, "component_name": {"buckets": []}}
            ]}}}),
        ));
        let ctx = context(store, &[], None);

        let page = BuiltComponentsHandler.handle(&request(), &ctx).await.unwrap();

        assert_eq!(page.data, vec!["c1", "c2"]);
        assert_eq!(page.aux["c1"], "c1");
        assert_eq!(page.aux["c2"], "web");
    }

    #[tokio::test]
    async fn empty_response_gives_empty_page() {
        let ctx = context(Arc::new(MockDatastore::default()), &[], None);
        let page = BuiltComponentsHandler.handle(&request(), &ctx).await.unwrap();
        assert_eq!(page, PageBase::default());
    }
}
