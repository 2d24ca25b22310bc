use news_ingestor::parser::parse_feed;
use news_ingestor::types::IngestError;

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>City Desk</title>
    <link>http://example.com/</link>
    <description>Local news</description>
    <language>fr-FR</language>
    <item>
      <title>Premi&#232;re d&#233;p&#234;che</title>
      <link>http://example.com/a</link>
      <description>R&#233;sum&#233; &lt;b&gt;riche&lt;/b&gt;</description>
      <pubDate>Mon, 06 Jan 2025 10:00:00 GMT</pubDate>
      <media:thumbnail url="http://example.com/thumb.jpg"/>
    </item>
  </channel>
</rss>"#;

const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Desk</title>
  <id>urn:feed</id>
  <updated>2025-01-06T10:00:00Z</updated>
  <entry>
    <title>Entry</title>
    <id>urn:entry-1</id>
    <updated>2025-01-06T10:00:00Z</updated>
    <link rel="alternate" href="http://example.com/e1"/>
    <link rel="enclosure" type="image/png" href="http://example.com/pic.png"/>
    <summary>plain</summary>
  </entry>
</feed>"#;

const EMPTY_CHANNEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Quiet Desk</title>
    <link>http://example.com/</link>
    <description>nothing published</description>
  </channel>
</rss>"#;

#[test]
fn maps_rss_channel_and_items() {
    let feed = parse_feed(RSS.as_bytes()).expect("feed should parse");
    assert_eq!(feed.language.as_deref(), Some("fr-FR"));
    assert_eq!(feed.items.len(), 1);

    let item = &feed.items[0];
    assert_eq!(item.title.as_deref(), Some("Première dépêche"));
    assert_eq!(item.link.as_deref(), Some("http://example.com/a"));
    assert!(item.summary.as_deref().expect("summary").contains("riche"));
    assert!(item.published.is_some());
    assert_eq!(
        item.media_thumbnails,
        vec!["http://example.com/thumb.jpg".to_string()]
    );
}

#[test]
fn atom_enclosure_link_is_kept_apart_from_the_item_link() {
    let feed = parse_feed(ATOM.as_bytes()).expect("feed should parse");
    let item = &feed.items[0];

    assert_eq!(item.link.as_deref(), Some("http://example.com/e1"));
    let enclosure = item.enclosure.as_ref().expect("enclosure");
    assert_eq!(enclosure.url, "http://example.com/pic.png");
    assert_eq!(enclosure.mime_type.as_deref(), Some("image/png"));
}

#[test]
fn empty_channel_parses_with_zero_items() {
    let feed = parse_feed(EMPTY_CHANNEL.as_bytes()).expect("feed should parse");
    assert!(feed.items.is_empty());
}

#[test]
fn non_feed_input_is_rejected_as_malformed() {
    let err = parse_feed(b"this is not a feed").expect_err("parse should fail");
    assert!(matches!(err, IngestError::FeedMalformed(_)));
}
