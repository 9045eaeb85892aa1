//! HTML parsers for AnimeKai pages
//!
//! This module contains the extractors for AnimeKai HTML pages:
//! - `home`: Parse the landing page
//! - `details`: Parse a single anime's detail page
//! - `dom`: Element queries shared by both

pub mod details;
pub mod dom;
pub mod home;

use tracing::warn;

use crate::error::{AnimeKaiError, Result};

// Re-export main parsing functions
pub use details::parse_anime_details;
pub use dom::{extract_background_url, parse_count};
pub use home::parse_home_page;

/// Reject input that is not markup at all.
///
/// The HTML5 tree builder recovers from any input, so this is checked up
/// front: blank input, or input without a single tag opener, is not a page.
pub(crate) fn ensure_markup(html: &str) -> Result<()> {
    let has_tag = html
        .match_indices('<')
        .any(|(idx, _)| {
            html[idx + 1..]
                .chars()
                .next()
                .map_or(false, |c| c.is_ascii_alphabetic() || c == '!' || c == '/')
        });

    if html.trim().is_empty() || !has_tag {
        warn!(input_len = html.len(), "Input is not HTML markup");
        return Err(AnimeKaiError::ParseError {
            input_len: html.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_markup_accepts_documents() {
        assert!(ensure_markup("<html></html>").is_ok());
        assert!(ensure_markup("<!DOCTYPE html>").is_ok());
        assert!(ensure_markup("  <div>fragment</div>").is_ok());
    }

    #[test]
    fn test_ensure_markup_rejects_text() {
        assert!(ensure_markup("").is_err());
        assert!(ensure_markup("\n\t ").is_err());
        assert!(ensure_markup("plain text").is_err());
        assert!(ensure_markup("1 < 2").is_err());
        assert!(ensure_markup("trailing <").is_err());
    }

    #[test]
    fn test_parse_error_carries_input_length() {
        match ensure_markup("{\"json\": true}") {
            Err(AnimeKaiError::ParseError { input_len }) => assert_eq!(input_len, 14),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }
}
