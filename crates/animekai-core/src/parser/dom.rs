//! Shared element queries for the AnimeKai parsers
//!
//! Small typed helpers over `scraper::ElementRef`: selecting by structural
//! anchor, reading text and attributes, recovering image URLs, coercing
//! counts and locating label-keyed blocks.

use scraper::{ElementRef, Selector};

/// Select all descendants of `scope` matching `css`, in document order.
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Select the first descendant of `scope` matching `css`.
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// Trimmed text content of an element.
pub fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match of `css`, or an empty string.
pub fn first_text(scope: ElementRef, css: &str) -> String {
    select_first(scope, css).map(text_of).unwrap_or_default()
}

/// Trimmed, non-empty attribute value.
pub fn attr_of(element: ElementRef, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Turn an empty string into `None`.
pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse a count from the leading digits of `text`.
///
/// Leading whitespace is skipped; anything after the digit run is ignored.
/// Returns `None` when there are no leading digits, so "0 Sub" (`Some(0)`)
/// stays distinguishable from "N/A" (`None`).
///
/// # Examples
/// ```
/// use animekai_core::parser::parse_count;
///
/// assert_eq!(parse_count("1200 Sub"), Some(1200));
/// assert_eq!(parse_count("  7"), Some(7));
/// assert_eq!(parse_count("Sub 12"), None);
/// ```
pub fn parse_count(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..end];

    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Extract the URL of a `background-image: url(...)` declaration from an
/// inline style string.
///
/// # Examples
/// ```
/// use animekai_core::parser::extract_background_url;
///
/// assert_eq!(
///     extract_background_url("background-image: url('https://x/a.jpg');"),
///     Some("https://x/a.jpg".to_string())
/// );
/// assert_eq!(extract_background_url("color: red"), None);
/// ```
pub fn extract_background_url(style: &str) -> Option<String> {
    let re = regex_lite::Regex::new(
        r#"(?i)background-image\s*:\s*url\(\s*["']?([^"')]*?)["']?\s*\)"#,
    )
    .ok()?;
    let caps = re.captures(style)?;
    let url = caps.get(1)?.as_str().trim();
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Background image URL from the element's own `style` attribute.
pub fn background_image(element: ElementRef) -> Option<String> {
    let style = element.value().attr("style")?;
    extract_background_url(style)
}

/// Source of a lazy-loaded image: `data-src`, falling back to `src`.
///
/// Looks at `element` itself when it is an `<img>`, otherwise at its first
/// `<img>` descendant.
pub fn img_source(element: ElementRef) -> Option<String> {
    let img = if element.value().name() == "img" {
        element
    } else {
        select_first(element, "img")?
    };
    attr_of(img, "data-src").or_else(|| attr_of(img, "src"))
}

/// Thumbnail of a tile, whichever way it is rendered. Empty when missing.
pub fn tile_image(element: ElementRef) -> String {
    background_image(element)
        .or_else(|| img_source(element))
        .unwrap_or_default()
}

/// How a label-keyed block is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Text of every anchor in the block
    Links,
    /// Text of the block's value span(s), or the text trailing the label
    Value,
    /// Text of the first span only
    FirstValue,
}

/// Value extracted from a label-keyed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Labeled {
    List(Vec<String>),
    Text(Option<String>),
}

/// Find the block rendering `label` inside `scope`.
///
/// Starts at the innermost `div` whose text contains the label, the first
/// one in document order. When the label sits in its own `div` next to the
/// value, the enclosing row is used instead: ancestors are climbed (within
/// `scope`) up to the first one holding the element `mode` reads (`a` for
/// links, `span` otherwise). Climbing stops at the first ancestor that also
/// holds other rows, and the innermost `div` is kept if no row qualifies.
pub fn find_labeled_block<'a>(
    scope: ElementRef<'a>,
    label: &str,
    mode: ExtractMode,
) -> Option<ElementRef<'a>> {
    let selector = Selector::parse("div").ok()?;
    let innermost = scope
        .select(&selector)
        .filter(|div| div.text().collect::<String>().contains(label))
        .find(|div| {
            !div
                .select(&selector)
                .any(|inner| inner.text().collect::<String>().contains(label))
        })?;

    let target = match mode {
        ExtractMode::Links => "a",
        ExtractMode::Value | ExtractMode::FirstValue => "span",
    };
    if select_first(innermost, target).is_some() {
        return Some(innermost);
    }

    innermost
        .ancestors()
        .take_while(|node| *node != *scope)
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "div")
        .take_while(|row| is_single_row(*row, innermost, label))
        .find(|row| select_first(*row, target).is_some())
        .or(Some(innermost))
}

/// Whether every `div` inside `row` lies on the path to the label's `div`,
/// i.e. `row` wraps this label only and no sibling rows.
fn is_single_row(row: ElementRef, innermost: ElementRef, label: &str) -> bool {
    select_all(row, "div").into_iter().all(|div| {
        div.text().collect::<String>().contains(label)
            || div.ancestors().any(|node| node == *innermost)
    })
}

/// Locate the block for `label` and extract it according to `mode`.
///
/// A missing block yields an empty list for `Links` and `None` otherwise.
pub fn extract_labeled(scope: ElementRef, label: &str, mode: ExtractMode) -> Labeled {
    let block = find_labeled_block(scope, label, mode);

    match mode {
        ExtractMode::Links => Labeled::List(
            block
                .map(|block| {
                    select_all(block, "a")
                        .into_iter()
                        .map(text_of)
                        .filter(|text| !text.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        ),
        ExtractMode::Value => Labeled::Text(block.and_then(|block| block_value(block, label))),
        ExtractMode::FirstValue => Labeled::Text(
            block
                .and_then(|block| select_first(block, "span"))
                .map(text_of)
                .and_then(non_empty),
        ),
    }
}

/// Scalar value of a block: its outermost spans, or the text after the label.
fn block_value(block: ElementRef, label: &str) -> Option<String> {
    let spans: Vec<String> = select_all(block, "span")
        .into_iter()
        .filter(|span| is_outermost_span(*span, block))
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect();

    if !spans.is_empty() {
        return Some(spans.join(" "));
    }

    let text = block.text().collect::<String>();
    let after = text.split_once(label).map(|(_, rest)| rest)?;
    let cleaned = after.split_whitespace().collect::<Vec<_>>().join(" ");
    non_empty(cleaned)
}

/// Whether no other span sits between `span` and `block`.
fn is_outermost_span(span: ElementRef, block: ElementRef) -> bool {
    !span
        .ancestors()
        .take_while(|node| *node != *block)
        .any(|node| {
            node.value()
                .as_element()
                .map_or(false, |element| element.name() == "span")
        })
}
