use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use super::model::{AlertRecord, PageEnvelope};
use super::source::{FiredAlertSource, TrackedAlertSource};

/// Entries requested per page
pub const PAGE_SIZE: usize = 30;

/// Default upper bound on pages fetched for one collection
pub const DEFAULT_MAX_PAGES: usize = 1000;

const SAVED_SEARCHES_PATH: &str = "/services/saved/searches";
const TRACKED_ALERTS_FILTER: &str = "alert.track=1";

/// Connection settings for the Splunk REST API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: String,
    /// Accept any server certificate
    pub insecure_skip_verify: bool,
    pub request_timeout: Duration,
    /// Hard stop for the pagination loop
    pub max_pages: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            insecure_skip_verify: false,
            request_timeout: Duration::from_secs(30),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Client for the Splunk saved-search and fired-alert collections
///
/// Configuration is fixed at construction; clones share the underlying
/// connection pool and can be used concurrently.
#[derive(Debug, Clone)]
pub struct SplunkClient {
    http_client: reqwest::Client,
    base_url: String,
    max_pages: usize,
}

impl SplunkClient {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|e| TransportError::Build(format!("invalid access token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if config.insecure_skip_verify {
            tracing::warn!("TLS certificate verification is disabled for the Splunk API");
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_pages: config.max_pages.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all saved searches with alert tracking enabled
    pub async fn list_tracked_alerts(&self) -> Result<Vec<AlertRecord>, TransportError> {
        let url = format!("{}{}", self.base_url, SAVED_SEARCHES_PATH);
        self.query(&url, &[("search", TRACKED_ALERTS_FILTER)]).await
    }

    /// List the fired-alert events behind a saved search's alerts link
    pub async fn list_fired_alerts(&self, url: &str) -> Result<Vec<AlertRecord>, TransportError> {
        let url = self.resolve(url);
        self.query(&url, &[]).await
    }

    /// Links returned by Splunk are server-relative paths
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Fetch every page of a collection.
    ///
    /// The total declared by the first page is trusted for the whole loop.
    async fn query(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<AlertRecord>, TransportError> {
        let mut entries: Vec<AlertRecord> = Vec::new();
        let mut total: Option<usize> = None;
        let mut pages = 0;
        let count = PAGE_SIZE.to_string();

        while total.map_or(true, |t| entries.len() < t) {
            if pages == self.max_pages {
                return Err(TransportError::PageLimitExceeded {
                    pages,
                    total: total.unwrap_or_default(),
                    received: entries.len(),
                });
            }

            let offset = entries.len().to_string();
            let response = self
                .http_client
                .get(url)
                .query(&[
                    ("count", count.as_str()),
                    ("offset", offset.as_str()),
                    ("output_mode", "json"),
                ])
                .query(params)
                .send()
                .await
                .map_err(TransportError::from_reqwest)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: PageEnvelope = response
                .json()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))?;
            pages += 1;

            tracing::trace!(
                url = %url,
                offset = %offset,
                total = page.paging.total,
                received = page.entries.len(),
                "Splunk page received"
            );

            total.get_or_insert(page.paging.total);
            entries.extend(page.entries);
        }

        Ok(entries)
    }
}

#[async_trait]
impl TrackedAlertSource for SplunkClient {
    async fn tracked_alerts(&self) -> Result<Vec<AlertRecord>, TransportError> {
        self.list_tracked_alerts().await
    }
}

#[async_trait]
impl FiredAlertSource for SplunkClient {
    async fn fired_alerts(&self, url: &str) -> Result<Vec<AlertRecord>, TransportError> {
        self.list_fired_alerts(url).await
    }
}

/// Failures talking to the Splunk API
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Unexpected status code {status}. Full response: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Gave up after {pages} pages: received {received} of {total} entries")]
    PageLimitExceeded {
        pages: usize,
        total: usize,
        received: usize,
    },

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl TransportError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}
