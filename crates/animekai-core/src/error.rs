//! Error types for AnimeKai Scraper
//!
//! This module defines all error types used throughout the library.
//! AnimeKaiError implements Serialize so it can be handed to JSON-speaking callers.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for AnimeKai Scraper operations
#[derive(Error, Debug)]
pub enum AnimeKaiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Input could not be interpreted as an HTML document at all
    #[error("Failed to parse HTML: input of {input_len} bytes is not markup")]
    ParseError {
        /// Length of the rejected input, for diagnostics
        input_len: usize,
    },

    /// Missing or invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested page was not found (HTTP 404)
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Client configuration rejected before any request is made
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fetched document exceeds the configured size bound
    #[error("Document too large: {len} bytes (limit {limit})")]
    DocumentTooLarge { len: usize, limit: usize },
}

/// Serialize AnimeKaiError as its display string
impl Serialize for AnimeKaiError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for AnimeKai Scraper operations
pub type Result<T> = std::result::Result<T, AnimeKaiError>;
