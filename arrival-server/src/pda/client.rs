//! Taipei bus PDA HTTP client.
//!
//! Fetches the static stop page and the live arrival feed for a stop
//! location. Transport failures are classified and returned; nothing is
//! retried here.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{RouteMap, StopId};

use super::ArrivalSource;
use super::error::PdaError;
use super::feed::{FeedSnapshot, parse_feed};
use super::markup::parse_route_rows;

/// Default base URL for the PDA service.
const DEFAULT_BASE_URL: &str = "https://pda5284.gov.taipei/MQS";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the PDA client.
#[derive(Debug, Clone)]
pub struct PdaConfig {
    /// Base URL for the service (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PdaConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for PdaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// PDA service client.
///
/// Uses a semaphore to bound concurrent requests against the service.
#[derive(Debug, Clone)]
pub struct PdaClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl PdaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PdaConfig) -> Result<Self, PdaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// GET `{base_url}/{path}` and return the body of a successful response.
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, PdaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| PdaError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, path);

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        debug!(%url, status = status.as_u16(), "PDA response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PdaError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.text().await?)
    }
}

impl ArrivalSource for PdaClient {
    async fn fetch_routes(&self, stop: &StopId) -> Result<RouteMap, PdaError> {
        let body = self
            .get_text("stoplocation.jsp", &[("slid", stop.as_str())])
            .await?;
        Ok(parse_route_rows(&body))
    }

    async fn fetch_signals(&self, stop: &StopId) -> Result<FeedSnapshot, PdaError> {
        let body = self
            .get_text("StopLocationDyna", &[("stoplocationid", stop.as_str())])
            .await?;
        parse_feed(&body)
    }
}
