use feed_rs::model::Entry;
use tracing::debug;

use crate::types::{Enclosure, FeedItem, IngestError, MediaRef, ParsedFeed, Result};

/// Parse raw feed bytes into the transient item model.
///
/// The body is handed to feed-rs regardless of the declared Content-Type,
/// so feeds that label XML as text/html still parse.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed =
        feed_rs::parser::parse(bytes).map_err(|e| IngestError::FeedMalformed(e.to_string()))?;

    let language = feed.language.clone();
    let items: Vec<FeedItem> = feed.entries.into_iter().map(map_entry).collect();
    debug!(items = items.len(), "parsed feed");

    Ok(ParsedFeed { language, items })
}

/// Flatten a feed-rs entry into a [`FeedItem`].
///
/// Enclosures surface in different places depending on the dialect: RSS
/// `<enclosure>` lands on `Content::src`, Atom keeps `rel="enclosure"`
/// links in the link list. Both are swept here.
fn map_entry(entry: Entry) -> FeedItem {
    let title = entry.title.as_ref().map(|t| t.content.clone());

    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() != Some("enclosure"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone());

    let summary = entry.summary.as_ref().map(|s| s.content.clone());
    let content = entry.content.as_ref().and_then(|c| c.body.clone());
    let published = entry.published.or(entry.updated);

    let enclosure = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("enclosure"))
        .map(|l| Enclosure {
            url: l.href.clone(),
            mime_type: l.media_type.clone(),
        })
        .or_else(|| {
            entry.content.as_ref().and_then(|c| {
                c.src.as_ref().map(|src| Enclosure {
                    url: src.href.clone(),
                    mime_type: declared_mime(c.content_type.essence_str()),
                })
            })
        });

    let media_content = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter_map(|c| {
            c.url.as_ref().map(|u| MediaRef {
                url: u.to_string(),
                mime_type: c.content_type.as_ref().map(|m| m.essence_str().to_string()),
            })
        })
        .collect();

    let media_thumbnails = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.clone())
        .collect();

    FeedItem {
        title,
        link,
        summary,
        content,
        published,
        enclosure,
        media_content,
        media_thumbnails,
    }
}

// feed-rs substitutes a default type when an enclosure carries no `type`
// attribute; treat those as "unspecified" so image detection stays
// permissive.
fn declared_mime(essence: &str) -> Option<String> {
    match essence {
        "application/octet-stream" | "text/plain" => None,
        other => Some(other.to_string()),
    }
}
