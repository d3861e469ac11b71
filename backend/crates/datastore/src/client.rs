use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::gateway::Datastore;
use crate::indices::IndexAlias;
use insights_common::error::{InsightsError, InsightsResult};

#[derive(Debug, Clone)]
pub struct DatastoreClientConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_base_ms: u64,
}

impl DatastoreClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: None,
            password: None,
            max_retries: 3,
            timeout_secs: 30,
            backoff_base_ms: 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatastoreClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl From<DatastoreClientError> for InsightsError {
    fn from(err: DatastoreClientError) -> Self {
        InsightsError::Datastore(err.to_string())
    }
}

/// HTTP gateway to an OpenSearch-compatible cluster.
#[derive(Clone)]
pub struct OpenSearchClient {
    client: Client,
    config: DatastoreClientConfig,
}

impl OpenSearchClient {
    pub fn new(config: DatastoreClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn search_url(&self, alias: IndexAlias) -> String {
        format!(
            "{}/{}/_search",
            self.config.base_url.trim_end_matches('/'),
            alias
        )
    }

    async fn post_with_retry(&self, url: &str, body: &str) -> Result<String, DatastoreClientError> {
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff_ms =
                    std::cmp::min(self.config.backoff_base_ms << attempt, 30_000);
                tracing::warn!(attempt, backoff_ms, "retrying datastore call after backoff");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }

            let mut request = self
                .client
                .post(url)
                .header("Content-Type", "application/json")
                .body(body.to_owned());
            if let Some(user) = &self.config.username {
                request = request.basic_auth(user, self.config.password.as_deref());
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() || e.is_connect() {
                        continue;
                    }
                    return Err(DatastoreClientError::RequestError(e));
                }
            };

            let status = response.status();

            if status.is_success() {
                return response
                    .text()
                    .await
                    .map_err(DatastoreClientError::RequestError);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    let wait = std::cmp::min(retry_after, 60);
                    tracing::warn!(wait, "datastore rate-limited, waiting Retry-After");
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
                last_error = "429 Too Many Requests".to_string();
                continue;
            }

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("{status}: {body}");
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(DatastoreClientError::HttpError { status, body });
        }

        Err(DatastoreClientError::MaxRetriesExceeded {
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }
}

#[async_trait]
impl Datastore for OpenSearchClient {
    async fn search(&self, query: &str, alias: IndexAlias) -> InsightsResult<String> {
        let started = Instant::now();
        let url = self.search_url(alias);
        let result = self.post_with_retry(&url, query).await;

        match &result {
            Ok(body) => tracing::debug!(
                %alias,
                took_ms = started.elapsed().as_millis() as u64,
                bytes = body.len(),
                "datastore search completed"
            ),
            Err(e) => tracing::error!(%alias, error = %e, "datastore search failed"),
        }

        Ok(result?)
    }
}
