use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::search;
use crate::binder::Bindings;
use crate::context::WidgetContext;
use crate::dispatch::WidgetHandler;
use crate::postprocess::sonar::{sonar, SonarKind};
use crate::request::WidgetRequest;
use crate::rewrite::RewriteMode;
use crate::templates;
use insights_common::error::InsightsResult;
use insights_datastore::IndexAlias;

pub struct SonarHandler {
    kind: SonarKind,
}

#[async_trait]
impl WidgetHandler for SonarHandler {
    fn name(&self) -> &'static str {
        self.kind.handler_name()
    }

    async fn handle(
        &self,
        _widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value> {
        let bindings = Bindings::new()
            .with("orgId", request.effective_org_id()?)
            .with("endTime", request.end_time)
            .with("size", self.kind.report_count());
        let raw = search(
            ctx,
            templates::LATEST_SCAN_REPORTS,
            &bindings,
            request,
            &RewriteMode::Sonar,
            IndexAlias::RawScanResults,
        )
        .await?;
        sonar(self.kind, &raw)
    }
}

pub fn handlers() -> Vec<Arc<dyn WidgetHandler>> {
    [
        SonarKind::IssueTypes,
        SonarKind::IssueTypesSection,
        SonarKind::Coverage,
        SonarKind::Duplication,
    ]
    .into_iter()
    .map(|kind| Arc::new(SonarHandler { kind }) as Arc<dyn WidgetHandler>)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{context, MockDatastore};
    use serde_json::json;

    #[tokio::test]
    async fn section_requests_two_reports_on_branch() {
        let store = Arc::new(MockDatastore::default().with(
            IndexAlias::RawScanResults,
            json!({"hits": {"hits": [{"_source": {"coverage": 70.0, "files": []}}]}}),
        ));
        let ctx = context(store.clone(), &[], None);
        let req = WidgetRequest {
            org_id: "o".to_string(),
            branch: Some("gh-1".to_string()),
            ..Default::default()
        };

        let handler = SonarHandler {
            kind: SonarKind::IssueTypesSection,
        };
        let out = handler.handle("sonarIssueTypesSection", &req, &ctx).await.unwrap();
        assert_eq!(out[0]["previous"], 0);

        let (_, query) = &store.queries()[0];
        let parsed: Value = serde_json::from_str(query).unwrap();
        assert_eq!(parsed["size"], 2);
        assert_eq!(
            parsed["query"]["bool"]["filter"].as_array().unwrap().last().unwrap(),
            &json!({"term": {"github_branch_id": "gh-1"}})
        );
    }

    #[tokio::test]
    async fn coverage_without_reports_is_null() {
        let ctx = context(Arc::new(MockDatastore::default()), &[], None);
        let req = WidgetRequest {
            org_id: "o".to_string(),
            ..Default::default()
        };
        let handler = SonarHandler {
            kind: SonarKind::Coverage,
        };
        assert!(handler.handle("sonarCoverage", &req, &ctx).await.unwrap().is_null());
    }
}
