//! HTTP client with connection pooling and retry logic
//!
//! One `fetch` is a single network attempt with a per-attempt timeout.
//! `fetch_with_retry` wraps it with exponential backoff for transient
//! failures and reports exactly one terminal outcome per logical call to
//! the health monitor. Not-found and malformed documents are never
//! retried. This layer never touches the cache.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::{debug, warn};
use url::Url;

use berth_core::BerthError;

use crate::api::{Document, RegistryKey};
use crate::health::HealthMonitor;
use crate::RegistryResult;

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Ceiling on the computed backoff delay
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each attempt
    pub multiplier: f64,
    /// Upper bound (exclusive) on the random jitter added to each delay
    pub max_jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            max_jitter: Duration::from_secs(1),
        }
    }
}

/// HTTP client for one registry endpoint
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    http: Client,
    /// Base registry URL, without trailing slash
    base_url: String,
    /// Per-attempt timeout
    timeout: Duration,
    /// Retry configuration
    retry: RetryConfig,
    /// Observer for terminal fetch outcomes
    health: Arc<HealthMonitor>,
}

impl RegistryClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        retry: RetryConfig,
        health: Arc<HealthMonitor>,
    ) -> RegistryResult<Self> {
        Url::parse(base_url).map_err(|e| BerthError::ConfigValidation {
            field: "base_url".to_string(),
            reason: format!("'{}' is not a valid URL: {}", base_url, e),
        })?;

        let http = ClientBuilder::new()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .gzip(true)
            .user_agent(concat!("berth/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BerthError::connection("client", "failed to create HTTP client", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            retry,
            health,
        })
    }

    /// Perform a single fetch attempt for one key.
    ///
    /// Distinguishes permanent absence (404) from connectivity failures
    /// and from malformed documents; callers decide what is retriable.
    pub async fn fetch(&self, key: &RegistryKey) -> RegistryResult<Document> {
        let url = format!("{}/{}", self.base_url, key.path());
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(key, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BerthError::RegistryNotFound {
                key: key.cache_key(),
            }),
            status if status.is_success() => {
                let value = response
                    .json::<serde_json::Value>()
                    .await
                    .map_err(|e| {
                        if e.is_decode() {
                            BerthError::data(
                                key.cache_key(),
                                format!("body is not valid JSON: {}", e),
                            )
                        } else {
                            classify_transport_error(key, e)
                        }
                    })?;
                Document::parse(key, value)
            }
            status => Err(BerthError::connection_msg(
                key.cache_key(),
                format!("registry returned status {}", status),
            )),
        }
    }

    /// Fetch one key, retrying transient failures with exponential backoff.
    ///
    /// Reports exactly one terminal outcome to the health monitor no
    /// matter how many attempts were made.
    pub async fn fetch_with_retry(&self, key: &RegistryKey) -> RegistryResult<Document> {
        let mut delay = self.retry.initial_delay;
        let mut last_error = None;

        for attempt in 0..=self.retry.max_retries {
            match self.fetch(key).await {
                Ok(document) => {
                    self.health.record_success();
                    return Ok(document);
                }
                Err(error) => {
                    if !error.is_transient() {
                        // An upstream publishing defect, not network instability
                        if let BerthError::RegistryData { .. } = &error {
                            warn!(key = %key, error = %error, "registry served a malformed document");
                        }
                        self.health.record_failure();
                        return Err(error);
                    }
                    last_error = Some(error);

                    if attempt == self.retry.max_retries {
                        break;
                    }

                    let sleep_for = delay + self.jitter();
                    debug!(
                        key = %key,
                        attempt,
                        delay_ms = sleep_for.as_millis() as u64,
                        "transient registry failure, backing off"
                    );
                    tokio::time::sleep(sleep_for).await;

                    delay = std::cmp::min(delay.mul_f64(self.retry.multiplier), self.retry.max_delay);
                }
            }
        }

        self.health.record_failure();
        Err(last_error.unwrap_or_else(|| {
            BerthError::connection_msg(key.cache_key(), "retry budget exhausted")
        }))
    }

    pub(crate) fn health(&self) -> &HealthMonitor {
        &self.health
    }

    /// Random jitter in `[0, max_jitter)`.
    ///
    /// The rng is created per call; it must not be held across an await.
    fn jitter(&self) -> Duration {
        let cap = self.retry.max_jitter.as_millis() as u64;
        if cap == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..cap))
    }
}

fn classify_transport_error(key: &RegistryKey, error: reqwest::Error) -> BerthError {
    let message = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    BerthError::connection(key.cache_key(), message, error)
}
