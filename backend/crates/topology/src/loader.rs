use std::time::Duration;

use reqwest::Client;

use crate::cache::InMemoryTopology;
use crate::models::TopologyNode;
use insights_common::error::{InsightsError, InsightsResult};

/// Pulls a full topology snapshot from the resource service.
#[derive(Clone)]
pub struct TopologyLoader {
    client: Client,
    base_url: String,
}

impl TopologyLoader {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub async fn load(&self) -> InsightsResult<InMemoryTopology> {
        let url = format!("{}/topology/nodes", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| InsightsError::Internal(format!("topology fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightsError::Internal(format!(
                "topology fetch returned HTTP {status}"
            )));
        }

        let nodes = response
            .json::<Vec<TopologyNode>>()
            .await
            .map_err(|e| InsightsError::Transform(format!("topology snapshot: {e}")))?;

        tracing::info!(nodes = nodes.len(), "loaded topology snapshot");
        Ok(InMemoryTopology::from_nodes(nodes))
    }
}
