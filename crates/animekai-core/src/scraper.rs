//! Main AnimeKai Scraper API
//!
//! This module provides the high-level API for scraping AnimeKai.
//! It combines the HTTP client, the response cache and the parsers behind
//! two calls: the home page and a single anime's detail page.

use std::time::Duration;

use tracing::info;

use crate::cache::ResponseCache;
use crate::client::AnimeKaiClient;
use crate::error::{AnimeKaiError, Result};
use crate::parser::{parse_anime_details, parse_home_page};
use crate::types::{AnimeDetails, HomePage};

/// Home page path on the client's base URL
const HOME_PATH: &str = "/home";

/// Default time-to-live of cached results
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Main scraper API for AnimeKai
///
/// Results are cached per URL for the configured time-to-live; concurrent
/// requests for the same URL share a single fetch.
///
/// # Example
/// ```no_run
/// use animekai_core::AnimeKaiScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = AnimeKaiScraper::new()?;
///
///     let home = scraper.home_page(None).await?;
///     println!("{} featured titles", home.featured.len());
///
///     Ok(())
/// }
/// ```
pub struct AnimeKaiScraper {
    client: AnimeKaiClient,
    cache_ttl: Duration,
    home_cache: ResponseCache<HomePage>,
    details_cache: ResponseCache<AnimeDetails>,
}

impl AnimeKaiScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = AnimeKaiClient::new()?;
        Ok(Self::with_client(client))
    }

    /// Create a new scraper with a custom client.
    ///
    /// This is useful for testing or when you need custom client configuration.
    pub fn with_client(client: AnimeKaiClient) -> Self {
        Self {
            client,
            cache_ttl: DEFAULT_CACHE_TTL,
            home_cache: ResponseCache::new(),
            details_cache: ResponseCache::new(),
        }
    }

    /// Set how long results stay cached.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Get the home page summary.
    ///
    /// # Arguments
    /// * `url` - Home page URL; `None` uses `/home` on the client's base URL
    ///   (`https://animekai.to/home` by default)
    ///
    /// # Returns
    /// * `Ok(HomePage)` with every section found on the page
    /// * `Err(AnimeKaiError)` if fetching fails or the body is not markup
    pub async fn home_page(&self, url: Option<&str>) -> Result<HomePage> {
        let url = url.map(str::trim).filter(|u| !u.is_empty()).unwrap_or(HOME_PATH);
        let url = self.client.resolve_url(url)?;
        let key = format!("home:{}", url);
        let client = &self.client;
        let url = url.as_str();

        self.home_cache
            .get_or_try_insert_with(&key, self.cache_ttl, || async move {
                let html = client.fetch(url).await?;
                let home = parse_home_page(&html)?;
                info!(url = %url, featured = home.featured.len(), "Scraped home page");
                Ok(home)
            })
            .await
    }

    /// Get the details of a single anime.
    ///
    /// # Arguments
    /// * `url` - Detail page URL (absolute, or a path on the base URL)
    ///
    /// # Returns
    /// * `Ok(AnimeDetails)` with the parsed metadata
    /// * `Err(AnimeKaiError::InvalidUrl)` if `url` is empty, whitespace-only or
    ///   neither absolute nor a path
    pub async fn anime_details(&self, url: &str) -> Result<AnimeDetails> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AnimeKaiError::InvalidUrl("Missing anime URL".to_string()));
        }
        let url = self.client.resolve_url(url)?;
        let key = format!("anime:{}", url);
        let client = &self.client;
        let url = url.as_str();

        self.details_cache
            .get_or_try_insert_with(&key, self.cache_ttl, || async move {
                let html = client.fetch(url).await?;
                let details = parse_anime_details(&html)?;
                info!(url = %url, title = %details.title, "Scraped anime details");
                Ok(details)
            })
            .await
    }

    /// Drop all cached results.
    pub async fn clear_cache(&self) {
        self.home_cache.clear().await;
        self.details_cache.clear().await;
    }
}
