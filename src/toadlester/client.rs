//! ToadLester API client implementation.
//!
//! Every lifecycle intent becomes exactly one `GET` with its parameters
//! embedded in the URL path. Response bodies are returned verbatim and the
//! status code is not inspected: the service answers 200 with an
//! explanatory body even when it rejects a request.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, Result};

use super::api::SeriesApi;
use super::types::{HealthStatus, Setting};

/// Path of the health probe endpoint.
const METRICS_PATH: &str = "/metrics";

/// ToadLester API client.
#[derive(Debug, Clone)]
pub struct ToadlesterClient {
    /// HTTP client.
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Base URL exactly as configured.
    endpoint: String,
}

impl ToadlesterClient {
    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the timeout is zero, or a transport
    /// error if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "Request timeout must be greater than 0 seconds",
                "timeout_secs",
            )
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ApiError::transport(&config.base_url, format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoint: config.base_url.clone(),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the reseed URL: `<base>/<name>/<value>`.
    #[must_use]
    pub fn reseed_url(&self, setting: &Setting) -> String {
        format!("{}/{}/{}", self.base_url, setting.name, setting.value)
    }

    /// Builds the series URL: `<base>/series/<type>/<algo>`.
    #[must_use]
    pub fn series_url(&self, setting: &Setting) -> String {
        format!(
            "{}/series/{}/{}",
            self.base_url,
            setting.generator_type(),
            setting.algo
        )
    }

    /// Creates a new looping sequence for the setting.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails.
    pub async fn create(&self, setting: &Setting) -> Result<String> {
        self.reseed(setting).await
    }

    /// Reads the setting's series.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails.
    pub async fn read(&self, setting: &Setting) -> Result<String> {
        self.read_series(setting).await
    }

    /// Replaces the current sequence; same remote call as [`Self::create`].
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails.
    pub async fn update(&self, setting: &Setting) -> Result<String> {
        self.reseed(setting).await
    }

    /// Discards the current sequence by reseeding it; same remote call as
    /// [`Self::create`].
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails.
    pub async fn delete(&self, setting: &Setting) -> Result<String> {
        self.reseed(setting).await
    }

    /// Probes `<base>/metrics`.
    ///
    /// Failures are reported inside the returned status.
    pub async fn health(&self) -> HealthStatus {
        let url = format!("{}{METRICS_PATH}", self.base_url);
        debug!("Probing health at {url}");

        let start = Instant::now();
        match self.client.get(&url).send().await {
            Ok(response) => {
                let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let status = response.status();
                HealthStatus {
                    url,
                    healthy: status.is_success(),
                    status_code: Some(status.as_u16()),
                    response_time_ms: Some(elapsed),
                    error: if status.is_success() {
                        None
                    } else {
                        Some(format!("HTTP {}", status.as_u16()))
                    },
                }
            }
            Err(e) => HealthStatus {
                url,
                healthy: false,
                status_code: None,
                response_time_ms: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Executes a single `GET` and returns the body as text.
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(url, format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(url, format!("Failed to read response body: {e}")))?;

        trace!("Response {} from {url}: {body}", status.as_u16());
        Ok(body)
    }
}

#[async_trait]
impl SeriesApi for ToadlesterClient {
    async fn reseed(&self, setting: &Setting) -> Result<String> {
        let url = self.reseed_url(setting);
        self.get_text(&url).await
    }

    async fn read_series(&self, setting: &Setting) -> Result<String> {
        let url = self.series_url(setting);
        self.get_text(&url).await
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}
