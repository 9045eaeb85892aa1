//! HTTP client with rate limiting for AnimeKai
//!
//! This module provides the page fetcher used by the scraper facade. It spaces
//! requests out, maps HTTP failures onto `AnimeKaiError` and bounds the size
//! of accepted documents. Failed requests are not retried.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{AnimeKaiError, Result};

/// Base URL for AnimeKai
pub const ANIMEKAI_BASE_URL: &str = "https://animekai.to";

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Default upper bound for a fetched document (8 MiB)
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 8 * 1024 * 1024;

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Example
    /// ```
    /// use animekai_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// ```
    ///
    /// # Panics
    /// Panics if `requests_per_second` is not a positive finite number.
    /// `AnimeKaiClient::with_config` checks this before building one.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let start = Instant::now()
            .checked_sub(min_interval)
            .unwrap_or_else(Instant::now);
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(start)),
        }
    }

    /// Wait until the minimum interval since the previous request has passed.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            debug!(wait_ms = wait_time.as_millis() as u64, "Rate limiter waiting");
            sleep(wait_time).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the AnimeKai HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative paths are joined to (default: https://animekai.to)
    pub base_url: String,
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Largest accepted document in bytes (default: 8 MiB)
    pub max_document_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ANIMEKAI_BASE_URL.to_string(),
            requests_per_second: 2.0,
            timeout_secs: 30,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// HTTP client for AnimeKai pages
pub struct AnimeKaiClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl AnimeKaiClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `AnimeKaiError::InvalidConfig` - `requests_per_second` is zero,
    ///   negative or not finite
    /// - `AnimeKaiError::HttpError` - the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let rps = config.requests_per_second;
        if !(rps.is_finite() && rps > 0.0) {
            return Err(AnimeKaiError::InvalidConfig(format!(
                "requests_per_second must be a positive number, got {}",
                rps
            )));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(config.requests_per_second);

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    /// Resolve `url` against the configured base URL.
    ///
    /// Absolute URLs are returned unchanged; paths starting with `/` are
    /// joined to the base URL.
    pub fn resolve_url(&self, url: &str) -> Result<String> {
        let url = url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        if url.starts_with('/') {
            return Ok(format!("{}{}", self.config.base_url.trim_end_matches('/'), url));
        }
        Err(AnimeKaiError::InvalidUrl(url.to_string()))
    }

    /// Fetch the HTML of a page
    ///
    /// # Arguments
    /// * `url` - Absolute URL, or a path relative to the base URL
    ///
    /// # Errors
    /// - `AnimeKaiError::InvalidUrl` - URL is neither absolute nor a path
    /// - `AnimeKaiError::NotFound` - Server returned 404
    /// - `AnimeKaiError::RateLimited` - Server returned 429
    /// - `AnimeKaiError::HttpError` - Network failure or other HTTP error
    /// - `AnimeKaiError::DocumentTooLarge` - Body exceeds `max_document_bytes`
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let url = self.resolve_url(url)?;

        self.rate_limiter.acquire().await;
        info!(url = %url, "Fetching page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AnimeKaiError::NotFound(url));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(url = %url, "Rate limited by server");
            return Err(AnimeKaiError::RateLimited);
        }
        let response = response.error_for_status()?;

        let limit = self.config.max_document_bytes;
        if let Some(len) = response.content_length() {
            if len as usize > limit {
                return Err(AnimeKaiError::DocumentTooLarge {
                    len: len as usize,
                    limit,
                });
            }
        }

        let body = response.text().await?;
        if body.len() > limit {
            return Err(AnimeKaiError::DocumentTooLarge {
                len: body.len(),
                limit,
            });
        }

        debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(body)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(2.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rate_limiter_different_rates() {
        let limiter = RateLimiter::new(1.0);
        assert_eq!(limiter.min_interval(), Duration::from_secs(1));

        let limiter = RateLimiter::new(4.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://animekai.to");
        assert_eq!(config.requests_per_second, 2.0);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_document_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn test_client_creation() {
        let client = AnimeKaiClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_resolve_url() {
        let client = AnimeKaiClient::with_config(ClientConfig {
            base_url: "https://mirror.example/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.resolve_url("/home").unwrap(),
            "https://mirror.example/home"
        );
        assert_eq!(
            client.resolve_url("https://animekai.to/watch/x").unwrap(),
            "https://animekai.to/watch/x"
        );
        assert!(matches!(
            client.resolve_url("watch/x"),
            Err(AnimeKaiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_client_rejects_non_positive_rate() {
        for rps in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = AnimeKaiClient::with_config(ClientConfig {
                requests_per_second: rps,
                ..Default::default()
            });
            assert!(
                matches!(result, Err(AnimeKaiError::InvalidConfig(_))),
                "rate {} should be rejected",
                rps
            );
        }
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire() {
        let limiter = RateLimiter::new(10.0); // 100ms interval

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(100));
    }
}
