//! Data types for AnimeKai Scraper
//!
//! This module contains all the value records produced by the extractors.
//! All types implement Serialize and Deserialize; JSON keys are camelCase and
//! absent optional fields are omitted.

use serde::{Deserialize, Serialize};

/// One tile in a carousel or list on the home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    /// Display title
    pub title: String,
    /// Alternative (usually Japanese) title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_title: Option<String>,
    /// Link to the anime page
    pub url: String,
    /// Thumbnail URL, empty when the tile has none
    pub image: String,
    /// Synopsis, empty outside the featured carousel
    pub description: String,
    /// Number of subtitled episodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_count: Option<u32>,
    /// Number of dubbed episodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dub_count: Option<u32>,
    /// Format such as "TV" or "Movie"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Release year as rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Age rating as rendered (e.g. "PG-13")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

/// Genre link from the navigation menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreLink {
    pub name: String,
    pub url: String,
}

/// Entry of the A-Z index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzLink {
    pub letter: String,
    pub url: String,
}

/// Everything extracted from the home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub featured: Vec<ListingEntry>,
    pub latest_updates: Vec<ListingEntry>,
    pub new_releases: Vec<ListingEntry>,
    pub trending: Vec<ListingEntry>,
    pub genres: Vec<GenreLink>,
    pub az_list: Vec<AzLink>,
}

/// Cross-reference to a related title (sequel, prequel, side story...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntry {
    pub title: String,
    pub url: String,
    pub image: String,
    /// Relation label as rendered, e.g. "Sequel"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

/// Cross-reference from the "Recommended" sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub title: String,
    pub url: String,
    pub image: String,
}

/// Full metadata of a single anime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_title: Option<String>,
    pub description: String,
    /// Poster image URL, empty when missing
    pub poster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_count: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premiered: Option<String>,
    /// Average user score as rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aired: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub studios: Vec<String>,
    pub producers: Vec<String>,
    pub related: Vec<RelatedEntry>,
    pub recommendations: Vec<RecommendationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_entry_serializes_camel_case() {
        let entry = ListingEntry {
            title: "Example Anime".to_string(),
            url: "/watch/example".to_string(),
            sub_count: Some(12),
            kind: Some("TV".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["subCount"], 12);
        assert_eq!(json["type"], "TV");
        assert_eq!(json["description"], "");
        assert!(json.get("dubCount").is_none());
        assert!(json.get("altTitle").is_none());
    }

    #[test]
    fn test_home_page_keys() {
        let json = serde_json::to_value(HomePage::default()).unwrap();
        assert!(json["latestUpdates"].as_array().unwrap().is_empty());
        assert!(json["newReleases"].as_array().unwrap().is_empty());
        assert!(json["azList"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_anime_details_lists_always_present() {
        let details = AnimeDetails::default();
        let json = serde_json::to_string(&details).unwrap();
        let back: AnimeDetails = serde_json::from_str(&json).unwrap();

        assert!(json.contains("\"studios\":[]"));
        assert!(json.contains("\"producers\":[]"));
        assert!(!json.contains("\"score\""));
        assert_eq!(back, details);
    }

    #[test]
    fn test_related_entry_relation_optional() {
        let entry = RelatedEntry {
            title: "Sequel".to_string(),
            url: "/watch/sequel".to_string(),
            image: String::new(),
            relation: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("relation"));
    }
}
