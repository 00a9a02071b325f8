//! HTTP source for the published history document.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, info};

use super::HistorySource;
use crate::config::SourceConfig;
use crate::errors::{HistoryError, HistoryResult};
use crate::model::HistoryDocument;

const USER_AGENT_VALUE: &str = concat!("bundler-history/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpHistorySource {
    client: reqwest::Client,
    url: String,
}

impl HttpHistorySource {
    pub fn new(config: &SourceConfig) -> HistoryResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| HistoryError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            url: config.history_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HistorySource for HttpHistorySource {
    /// Single attempt; any non-2xx status is a network error.
    async fn fetch(&self) -> HistoryResult<HistoryDocument> {
        debug!(url = %self.url, "fetching history");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return Err(HistoryError::Network {
                message: format!("HTTP {} {} from {}", status.as_u16(), reason, self.url),
            });
        }

        let body = response.bytes().await?;
        let doc: HistoryDocument = serde_json::from_slice(&body).map_err(|e| HistoryError::Parse {
            message: format!("{} is not a history document: {}", self.url, e),
        })?;

        info!(url = %self.url, snapshots = doc.len(), "fetched history");
        Ok(doc)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
