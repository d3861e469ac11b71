use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::indices::IndexAlias;
use insights_common::error::InsightsResult;

/// One query of a keyed multi-search batch.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub alias: IndexAlias,
    pub query: String,
}

impl SearchRequest {
    pub fn new(alias: IndexAlias, query: impl Into<String>) -> Self {
        Self {
            alias,
            query: query.into(),
        }
    }
}

/// Read-only access to the search/analytics datastore.
///
/// Responses are returned as raw text; callers own the decoding.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn search(&self, query: &str, alias: IndexAlias) -> InsightsResult<String>;

    /// Run every request concurrently. All-or-nothing: the first failure wins and
    /// no partial map is returned.
    async fn multi_search(
        &self,
        requests: HashMap<String, SearchRequest>,
    ) -> InsightsResult<HashMap<String, String>> {
        let pending = requests.into_iter().map(|(key, req)| async move {
            let raw = self.search(&req.query, req.alias).await?;
            Ok::<_, insights_common::error::InsightsError>((key, raw))
        });

        let responses = try_join_all(pending).await?;
        Ok(responses.into_iter().collect())
    }
}
