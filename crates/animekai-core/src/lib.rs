//! AnimeKai Scraper Core Library
//!
//! This crate provides the core scraping functionality for the AnimeKai
//! anime catalog.
//!
//! # Features
//! - Parse the home page: featured carousel, latest updates, new releases,
//!   trending, genres and the A-Z index
//! - Parse an anime detail page: metadata, credits, related titles and
//!   recommendations
//! - Rate-limited HTTP client and a keyed response cache with a time-to-live
//!
//! The parsers are pure functions of their HTML input and can be used
//! without the client:
//!
//! ```
//! use animekai_core::parse_home_page;
//!
//! let home = parse_home_page(r#"<div class="azlist"><ul><li><a href="/az-list/A">A</a></li></ul></div>"#).unwrap();
//! assert_eq!(home.az_list[0].letter, "A");
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use cache::ResponseCache;
pub use client::{AnimeKaiClient, ClientConfig, RateLimiter};
pub use error::{AnimeKaiError, Result};
pub use parser::{parse_anime_details, parse_home_page};
pub use scraper::AnimeKaiScraper;
pub use types::{
    AnimeDetails, AzLink, GenreLink, HomePage, ListingEntry, RecommendationEntry, RelatedEntry,
};
