//! Home page parser for AnimeKai
//!
//! Parses the landing page into its carousels, lists and navigation indexes.
//! Every section is located by its own structural anchor; a missing section
//! yields an empty list.

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::error::Result;
use crate::types::{AzLink, GenreLink, HomePage, ListingEntry};

use super::dom::{
    attr_of, background_image, extract_labeled, first_text, img_source, non_empty, parse_count,
    select_all, select_first, text_of, tile_image, ExtractMode, Labeled,
};
use super::ensure_markup;

/// Parse the AnimeKai home page.
///
/// # Arguments
/// * `html` - Raw HTML content of the home page
///
/// # Returns
/// * `Ok(HomePage)` with every section found on the page
/// * `Err(AnimeKaiError::ParseError)` if the input is not markup
///
/// # Examples
/// ```
/// use animekai_core::parser::parse_home_page;
///
/// let home = parse_home_page("<html><body></body></html>").unwrap();
/// assert!(home.featured.is_empty());
/// ```
pub fn parse_home_page(html: &str) -> Result<HomePage> {
    ensure_markup(html)?;
    let document = Html::parse_document(html);
    let root = document.root_element();

    let home = HomePage {
        featured: parse_featured(root),
        latest_updates: parse_latest_updates(root),
        new_releases: parse_new_releases(root),
        trending: parse_trending(root),
        genres: parse_genres(root),
        az_list: parse_az_list(root),
    };

    debug!(
        featured = home.featured.len(),
        latest_updates = home.latest_updates.len(),
        new_releases = home.new_releases.len(),
        trending = home.trending.len(),
        genres = home.genres.len(),
        az_list = home.az_list.len(),
        "Parsed home page"
    );

    Ok(home)
}

/// Parse the featured carousel (`#featured .swiper-slide`).
fn parse_featured(root: ElementRef) -> Vec<ListingEntry> {
    select_all(root, "#featured .swiper-slide")
        .into_iter()
        .map(parse_featured_slide)
        .collect()
}

/// Parse one featured slide. The slide's own style carries the backdrop.
fn parse_featured_slide(slide: ElementRef) -> ListingEntry {
    let image = background_image(slide).unwrap_or_default();

    let Some(detail) = select_first(slide, ".container .detail") else {
        return ListingEntry {
            image,
            ..Default::default()
        };
    };

    // Order is fixed: sub count, dub count, type, genres
    let info: Vec<String> = select_all(detail, ".info span")
        .into_iter()
        .map(text_of)
        .collect();
    let info_at = |index: usize| info.get(index).map(String::as_str).unwrap_or("");

    let genres = info.get(3).and_then(|text| {
        let genres: Vec<String> = text
            .split(',')
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty())
            .collect();
        if genres.is_empty() {
            None
        } else {
            Some(genres)
        }
    });

    let (year, rating) = match select_first(detail, ".mics") {
        Some(mics) => (mics_value(mics, "Release"), mics_value(mics, "Rating")),
        None => (None, None),
    };

    ListingEntry {
        title: first_text(detail, ".title"),
        alt_title: None,
        url: select_first(detail, ".watch-btn")
            .and_then(|button| attr_of(button, "href"))
            .unwrap_or_default(),
        image,
        description: first_text(detail, ".desc"),
        sub_count: parse_count(info_at(0)),
        dub_count: parse_count(info_at(1)),
        kind: non_empty(info_at(2).to_string()),
        genres,
        year,
        rating,
    }
}

fn mics_value(mics: ElementRef, label: &str) -> Option<String> {
    match extract_labeled(mics, label, ExtractMode::Value) {
        Labeled::Text(value) => value,
        Labeled::List(_) => None,
    }
}

/// Parse the latest updates grid (`#latest-updates .aitem`).
fn parse_latest_updates(root: ElementRef) -> Vec<ListingEntry> {
    select_all(root, "#latest-updates .aitem")
        .into_iter()
        .map(|item| {
            let title_el = select_first(item, ".title");
            let title = title_el
                .and_then(|el| attr_of(el, "title"))
                .or_else(|| title_el.map(text_of))
                .unwrap_or_default();

            ListingEntry {
                title,
                url: select_first(item, "a.poster")
                    .and_then(|poster| attr_of(poster, "href"))
                    .unwrap_or_default(),
                image: img_source(item).unwrap_or_default(),
                ..Default::default()
            }
        })
        .collect()
}

/// Parse the new releases list.
///
/// Only the first `.alist-group .swiper-slide` in document order is read; the
/// other slides of the group hold different lists.
fn parse_new_releases(root: ElementRef) -> Vec<ListingEntry> {
    let Some(slide) = select_first(root, ".alist-group .swiper-slide") else {
        return Vec::new();
    };

    select_all(slide, ".aitem")
        .into_iter()
        .map(|item| ListingEntry {
            title: attr_of(item, "title").unwrap_or_default(),
            url: attr_of(item, "href").unwrap_or_default(),
            image: img_source(item).unwrap_or_default(),
            ..Default::default()
        })
        .collect()
}

/// Parse the trending sidebar (`.top-anime .aitem`).
fn parse_trending(root: ElementRef) -> Vec<ListingEntry> {
    select_all(root, ".top-anime .aitem")
        .into_iter()
        .map(|item| ListingEntry {
            title: first_text(item, ".title"),
            url: attr_of(item, "href").unwrap_or_default(),
            image: tile_image(item),
            ..Default::default()
        })
        .collect()
}

fn parse_genres(root: ElementRef) -> Vec<GenreLink> {
    select_all(root, r#".nav-menu ul li a[href*="/genres/"]"#)
        .into_iter()
        .map(|link| GenreLink {
            name: text_of(link),
            url: attr_of(link, "href").unwrap_or_default(),
        })
        .collect()
}

fn parse_az_list(root: ElementRef) -> Vec<AzLink> {
    select_all(root, ".azlist ul li a")
        .into_iter()
        .map(|link| AzLink {
            letter: text_of(link),
            url: attr_of(link, "href").unwrap_or_default(),
        })
        .collect()
}
