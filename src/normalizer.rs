use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::FeedItem;

/// Marker class WordPress puts on a post's featured image.
const FEATURED_IMAGE_CLASS: &str = "wp-post-image";

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());
static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*["']([^"']+)["']"#).unwrap());
static IMG_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#).unwrap());

/// Strip markup tags, decode entities, and trim whitespace.
///
/// Returns `None` for missing input and for text that is empty once
/// cleaned. Pure, no I/O, no failure mode.
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let stripped = TAG.replace_all(raw, "");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Extract a representative image URL from an item.
///
/// Declared metadata is trusted over heuristic HTML scraping: enclosure,
/// then media `content`, then media `thumbnail`, then the first `<img>` in
/// the HTML body. Each step short-circuits on the first non-empty match.
pub fn extract_image(item: &FeedItem) -> Option<String> {
    from_enclosure(item)
        .or_else(|| from_media_content(item))
        .or_else(|| from_media_thumbnail(item))
        .or_else(|| from_html(item))
}

fn is_image(mime: Option<&str>) -> bool {
    match mime {
        None => true,
        Some(m) => m.starts_with("image/"),
    }
}

fn non_empty(url: &str) -> Option<String> {
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

fn from_enclosure(item: &FeedItem) -> Option<String> {
    let enclosure = item.enclosure.as_ref()?;
    if is_image(enclosure.mime_type.as_deref()) {
        non_empty(&enclosure.url)
    } else {
        None
    }
}

fn from_media_content(item: &FeedItem) -> Option<String> {
    item.media_content
        .iter()
        .filter(|c| is_image(c.mime_type.as_deref()))
        .find_map(|c| non_empty(&c.url))
}

fn from_media_thumbnail(item: &FeedItem) -> Option<String> {
    item.media_thumbnails.iter().find_map(|u| non_empty(u))
}

fn from_html(item: &FeedItem) -> Option<String> {
    let html = item.content.as_deref().or(item.summary.as_deref())?;

    let mut first: Option<String> = None;
    for tag in IMG_TAG.find_iter(html) {
        let tag = tag.as_str();
        let Some(src) = IMG_SRC
            .captures(tag)
            .and_then(|c| c.get(1))
            .and_then(|m| non_empty(m.as_str()))
        else {
            continue;
        };

        let featured = IMG_CLASS
            .captures(tag)
            .and_then(|c| c.get(1))
            .is_some_and(|c| c.as_str().contains(FEATURED_IMAGE_CLASS));
        if featured {
            return Some(src);
        }
        first.get_or_insert(src);
    }
    first
}
