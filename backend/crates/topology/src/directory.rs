use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use insights_common::error::{InsightsError, InsightsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryService {
    pub id: String,
    #[serde(default)]
    pub repository_url: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganisationServices {
    #[serde(default)]
    pub service: Vec<DirectoryService>,
}

/// Organization directory: lists the services (components) registered for an org.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    async fn organisation_services(&self, org_id: &str) -> InsightsResult<OrganisationServices>;
}

/// Used when no directory is configured: every org has no services.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDirectory;

#[async_trait]
impl OrganizationDirectory for EmptyDirectory {
    async fn organisation_services(&self, org_id: &str) -> InsightsResult<OrganisationServices> {
        tracing::debug!(org_id, "no organization directory configured");
        Ok(OrganisationServices::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid directory url: {0}")]
    InvalidUrl(String),
}

impl From<DirectoryClientError> for InsightsError {
    fn from(err: DirectoryClientError) -> Self {
        InsightsError::Directory(err.to_string())
    }
}

#[derive(Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
}

impl HttpDirectoryClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// `{base}/organisations/{org_id}/services`, with the id encoded as a
    /// single path segment.
    fn services_url(&self, org_id: &str) -> Result<Url, DirectoryClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DirectoryClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| DirectoryClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["organisations", org_id, "services"]);
        Ok(url)
    }

    async fn fetch(&self, org_id: &str) -> Result<OrganisationServices, DirectoryClientError> {
        let url = self.services_url(org_id)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(OrganisationServices::default());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryClientError::HttpError { status, body });
        }

        Ok(response.json::<OrganisationServices>().await?)
    }
}

#[async_trait]
impl OrganizationDirectory for HttpDirectoryClient {
    async fn organisation_services(&self, org_id: &str) -> InsightsResult<OrganisationServices> {
        let services = self.fetch(org_id).await?;
        tracing::debug!(org_id, count = services.service.len(), "fetched organisation services");
        Ok(services)
    }
}
