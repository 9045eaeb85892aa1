//! Anime detail page parser for AnimeKai
//!
//! Parses the watch/detail page of a single title: identity fields, the
//! label-keyed metadata list, related titles and recommendations.

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::error::Result;
use crate::types::{AnimeDetails, RecommendationEntry, RelatedEntry};

use super::dom::{
    attr_of, extract_labeled, first_text, img_source, non_empty, parse_count, select_all,
    select_first, text_of, tile_image, ExtractMode, Labeled,
};
use super::ensure_markup;

/// Metadata field filled from a label-keyed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailField {
    Genres,
    Country,
    Premiered,
    Score,
    Aired,
    Broadcast,
    Status,
    Episodes,
    Duration,
    Studios,
    Producers,
}

/// Label-keyed metadata rows of the detail page.
///
/// Rows are matched by label text, so their position in the page is irrelevant.
const LABELED_FIELDS: &[(&str, DetailField, ExtractMode)] = &[
    ("Genres:", DetailField::Genres, ExtractMode::Links),
    ("Country:", DetailField::Country, ExtractMode::Value),
    ("Premiered:", DetailField::Premiered, ExtractMode::Value),
    // The first span is the average; the rest is the review count
    ("Scores:", DetailField::Score, ExtractMode::FirstValue),
    ("Date aired:", DetailField::Aired, ExtractMode::Value),
    ("Broadcast:", DetailField::Broadcast, ExtractMode::Value),
    ("Status:", DetailField::Status, ExtractMode::Value),
    ("Episodes:", DetailField::Episodes, ExtractMode::Value),
    ("Duration:", DetailField::Duration, ExtractMode::Value),
    ("Studios:", DetailField::Studios, ExtractMode::Links),
    ("Producers:", DetailField::Producers, ExtractMode::Links),
];

/// Parse an AnimeKai anime detail page.
///
/// # Arguments
/// * `html` - Raw HTML content of the detail page
///
/// # Returns
/// * `Ok(AnimeDetails)`; fields whose region is missing keep their defaults
/// * `Err(AnimeKaiError::ParseError)` if the input is not markup
///
/// # Examples
/// ```
/// use animekai_core::parser::parse_anime_details;
///
/// let html = r#"<div class="watch-section-wrap"><div class="entity-section">
///   <h1 class="title">Example Anime</h1>
///   <div><div>Genres: <a>Action</a>, <a>Comedy</a></div></div>
/// </div></div>"#;
///
/// let details = parse_anime_details(html).unwrap();
/// assert_eq!(details.title, "Example Anime");
/// assert_eq!(details.genres, vec!["Action", "Comedy"]);
/// assert!(details.studios.is_empty());
/// ```
pub fn parse_anime_details(html: &str) -> Result<AnimeDetails> {
    ensure_markup(html)?;
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut details = AnimeDetails::default();

    if let Some(section) = select_first(root, ".watch-section-wrap .entity-section") {
        parse_identity(section, &mut details);

        for &(label, field, mode) in LABELED_FIELDS {
            apply_labeled(&mut details, field, extract_labeled(section, label, mode));
        }
    } else {
        debug!("Entity section not found, metadata left at defaults");
    }

    details.related = parse_related(root);
    details.recommendations = parse_recommendations(root);

    debug!(
        title = %details.title,
        genres = details.genres.len(),
        related = details.related.len(),
        recommendations = details.recommendations.len(),
        "Parsed anime details"
    );

    Ok(details)
}

/// Title, synopsis, poster and the rating/sub/type info row.
fn parse_identity(section: ElementRef, details: &mut AnimeDetails) {
    details.title = first_text(section, ".title");
    details.alt_title = non_empty(first_text(section, ".al-title"));
    details.description = first_text(section, ".desc");
    details.poster = select_first(section, ".poster")
        .and_then(img_source)
        .unwrap_or_default();

    // Order is fixed: rating, sub count, type
    let info: Vec<String> = select_all(section, ".info span")
        .into_iter()
        .map(text_of)
        .collect();
    details.rating = info.first().cloned().and_then(non_empty);
    details.sub_count = info.get(1).and_then(|text| parse_count(text));
    details.kind = info.get(2).cloned().and_then(non_empty);
}

fn apply_labeled(details: &mut AnimeDetails, field: DetailField, value: Labeled) {
    match (field, value) {
        (DetailField::Genres, Labeled::List(items)) => details.genres = items,
        (DetailField::Studios, Labeled::List(items)) => details.studios = items,
        (DetailField::Producers, Labeled::List(items)) => details.producers = items,
        (DetailField::Country, Labeled::Text(text)) => details.country = text,
        (DetailField::Premiered, Labeled::Text(text)) => details.premiered = text,
        (DetailField::Score, Labeled::Text(text)) => details.score = text,
        (DetailField::Aired, Labeled::Text(text)) => details.aired = text,
        (DetailField::Broadcast, Labeled::Text(text)) => details.broadcast = text,
        (DetailField::Status, Labeled::Text(text)) => details.status = text,
        (DetailField::Episodes, Labeled::Text(text)) => details.episodes = text,
        (DetailField::Duration, Labeled::Text(text)) => details.duration = text,
        (field, value) => debug!(?field, ?value, "Mismatched extraction mode"),
    }
}

/// Parse the related titles carousel (`#related-anime .aitem`).
fn parse_related(root: ElementRef) -> Vec<RelatedEntry> {
    select_all(root, "#related-anime .aitem")
        .into_iter()
        .map(|item| RelatedEntry {
            title: first_text(item, ".title"),
            url: attr_of(item, "href").unwrap_or_default(),
            image: tile_image(item),
            relation: non_empty(first_text(item, ".info b.text-muted")),
        })
        .collect()
}

/// Parse the "Recommended" sidebar.
///
/// Every `.sidebar-section` whose text mentions "Recommended" contributes its
/// items, in document order.
fn parse_recommendations(root: ElementRef) -> Vec<RecommendationEntry> {
    select_all(root, ".sidebar-section")
        .into_iter()
        .filter(|section| section.text().collect::<String>().contains("Recommended"))
        .flat_map(|section| select_all(section, ".aitem"))
        .map(|item| RecommendationEntry {
            title: first_text(item, ".title"),
            url: attr_of(item, "href").unwrap_or_default(),
            image: tile_image(item),
        })
        .collect()
}
