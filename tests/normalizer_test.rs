use news_ingestor::normalizer::{clean_text, extract_image};
use news_ingestor::types::{Enclosure, FeedItem, MediaRef};

fn html_item(html: &str) -> FeedItem {
    FeedItem {
        content: Some(html.to_string()),
        ..FeedItem::default()
    }
}

#[test]
fn clean_text_strips_markup_and_trims() {
    assert_eq!(
        clean_text(Some("  <p>Hello <b>world</b></p>  ")),
        Some("Hello world".to_string())
    );
}

#[test]
fn clean_text_decodes_entities() {
    assert_eq!(
        clean_text(Some("Fish &amp; Chips")),
        Some("Fish & Chips".to_string())
    );
}

#[test]
fn clean_text_returns_none_for_missing_or_empty_input() {
    assert_eq!(clean_text(None), None);
    assert_eq!(clean_text(Some("")), None);
    assert_eq!(clean_text(Some("   ")), None);
    assert_eq!(clean_text(Some("<br/>")), None);
}

#[test]
fn enclosure_beats_html_body() {
    let mut item = html_item(r#"<p><img src="http://x/body.jpg"></p>"#);
    item.enclosure = Some(Enclosure {
        url: "http://x/enc.jpg".to_string(),
        mime_type: Some("image/jpeg".to_string()),
    });
    assert_eq!(extract_image(&item), Some("http://x/enc.jpg".to_string()));
}

#[test]
fn enclosure_with_unspecified_mime_is_accepted() {
    let item = FeedItem {
        enclosure: Some(Enclosure {
            url: "http://x/enc.bin".to_string(),
            mime_type: None,
        }),
        ..FeedItem::default()
    };
    assert_eq!(extract_image(&item), Some("http://x/enc.bin".to_string()));
}

#[test]
fn non_image_enclosure_falls_through_to_the_next_extractor() {
    let item = FeedItem {
        enclosure: Some(Enclosure {
            url: "http://x/a.mp3".to_string(),
            mime_type: Some("audio/mpeg".to_string()),
        }),
        media_thumbnails: vec!["http://x/thumb.jpg".to_string()],
        ..FeedItem::default()
    };
    assert_eq!(extract_image(&item), Some("http://x/thumb.jpg".to_string()));
}

#[test]
fn media_content_beats_thumbnail() {
    let item = FeedItem {
        media_content: vec![MediaRef {
            url: "http://x/content.jpg".to_string(),
            mime_type: Some("image/jpeg".to_string()),
        }],
        media_thumbnails: vec!["http://x/thumb.jpg".to_string()],
        ..FeedItem::default()
    };
    assert_eq!(
        extract_image(&item),
        Some("http://x/content.jpg".to_string())
    );
}

#[test]
fn html_img_is_the_last_resort() {
    let item = html_item(r#"<p><img src="http://x/a.jpg"></p>"#);
    assert_eq!(extract_image(&item), Some("http://x/a.jpg".to_string()));
}

#[test]
fn featured_marker_class_wins_over_the_first_image() {
    let item = html_item(concat!(
        r#"<img src="http://x/first.jpg">"#,
        r#"<img class="size-full wp-post-image" src="http://x/featured.jpg">"#,
    ));
    assert_eq!(
        extract_image(&item),
        Some("http://x/featured.jpg".to_string())
    );
}

#[test]
fn summary_html_is_scanned_when_there_is_no_content_body() {
    let item = FeedItem {
        summary: Some(r#"teaser <img src="http://x/teaser.png"> text"#.to_string()),
        ..FeedItem::default()
    };
    assert_eq!(extract_image(&item), Some("http://x/teaser.png".to_string()));
}

#[test]
fn no_image_signal_yields_none() {
    assert_eq!(extract_image(&FeedItem::default()), None);
    assert_eq!(extract_image(&html_item("<p>words only</p>")), None);
}
