//! Registry metadata client.
//!
//! Fetches the work document for a DOI from the Crossref REST API. The
//! client makes one attempt per call; retries, if wanted, belong to the
//! caller.

use std::time::Duration;

use async_trait::async_trait;
use doi_core::Doi;
use serde_json::Value;
use thiserror::Error;

/// Default registry base URL.
pub const CROSSREF_BASE_URL: &str = "https://api.crossref.org";

/// Default contact address sent with every request.
pub const DEFAULT_MAILTO: &str = "pass@jhu.edu";

const API_VERSION: &str = "v1";
const WORKS_PATH: &str = "works";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Metadata fetch errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("work not found: {0}")]
    NotFound(String),

    #[error("registry unavailable: {0}")]
    Unavailable(String),

    #[error("unparsable registry response: {0}")]
    Unparsable(String),
}

/// Source of registry work metadata.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the parsed work document for `doi`.
    async fn fetch_work(&self, doi: &Doi) -> Result<Value, FetchError>;
}

/// Crossref client settings.
#[derive(Debug, Clone)]
pub struct CrossrefConfig {
    /// Base URL without the API version, e.g. `https://api.crossref.org`.
    pub base_url: String,
    /// Contact address for the polite-pool User-Agent.
    pub mailto: String,
    /// Connect and total request timeout.
    pub timeout: Duration,
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        Self {
            base_url: CROSSREF_BASE_URL.to_string(),
            mailto: DEFAULT_MAILTO.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Crossref REST API client
#[derive(Debug, Clone)]
pub struct CrossrefClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CrossrefClient {
    pub fn new(config: CrossrefConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent(&config.mailto))
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the works endpoint for `doi`.
    pub fn work_url(&self, doi: &Doi) -> String {
        format!("{}/{}/{}/{}", self.base_url, API_VERSION, WORKS_PATH, doi)
    }
}

fn user_agent(mailto: &str) -> String {
    format!(
        "{}/{} (mailto:{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        mailto
    )
}

#[async_trait]
impl MetadataSource for CrossrefClient {
    async fn fetch_work(&self, doi: &Doi) -> Result<Value, FetchError> {
        let url = self.work_url(doi);
        tracing::debug!(doi = %doi, url = %url, "Querying registry");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(doi.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::Unavailable(format!(
                "registry returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Unparsable(e.to_string()))
    }
}
