use feed_rs::model::Entry;

use super::types::FeedEntry;

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("feed parse error: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),
}

/// Parses an Atom, RSS or JSON Feed document, keeping the document's item order.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<Vec<FeedEntry>, FeedParseError> {
    let trimmed = trim_leading_ascii_whitespace(raw);
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }
    let feed = feed_rs::parser::parse(trimmed)?;
    Ok(feed.entries.iter().map(entry_from_feed).collect())
}

fn entry_from_feed(entry: &Entry) -> FeedEntry {
    let title = entry
        .title
        .as_ref()
        .map(|text| text.content.trim().to_string())
        .unwrap_or_default();
    let author = entry
        .authors
        .first()
        .map(|person| person.name.trim().to_string())
        .unwrap_or_default();
    let link = entry
        .links
        .iter()
        .find(|link| matches!(link.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .map(|link| link.href.clone())
        .unwrap_or_default();
    // RSS items only carry a publication date.
    let updated_at = entry.updated.or(entry.published);

    FeedEntry {
        title,
        author,
        link,
        updated_at,
    }
}

fn trim_leading_ascii_whitespace(raw: &[u8]) -> &[u8] {
    let mut index = 0;
    while index < raw.len() && raw[index].is_ascii_whitespace() {
        index += 1;
    }
    &raw[index..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_redmine_atom_fixture() {
        let xml = include_bytes!("../../../fixtures/redmine-activity.atom.xml");
        let entries = parse_feed_bytes(xml).expect("atom fixture must parse");

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            FeedEntry {
                title: "Bug #1042 (New): Login page returns 500 after upgrade".to_string(),
                author: "Alice Tanaka".to_string(),
                link: "https://redmine.example.com/issues/1042".to_string(),
                updated_at: Some(Utc.with_ymd_and_hms(2026, 2, 24, 10, 15, 0).unwrap()),
            }
        );
        assert_eq!(entries[1].author, "Bob Suzuki");
        assert_eq!(
            entries[1].link,
            "https://redmine.example.com/issues/1038#change-5521"
        );
        assert_eq!(entries[2].title, "Wiki edit: Deployment");
        assert_eq!(entries[2].updated_at, None);
    }

    #[test]
    fn rss_items_fall_back_to_pub_date() {
        let xml = include_bytes!("../../../fixtures/sample.rss.xml");
        let entries = parse_feed_bytes(xml).expect("rss fixture must parse");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Release 2.4.0");
        assert_eq!(entries[0].link, "https://example.com/releases/2.4.0");
        assert_eq!(
            entries[0].updated_at,
            Some(Utc.with_ymd_and_hms(2026, 2, 24, 8, 0, 0).unwrap())
        );
        assert_eq!(entries[1].author, "");
    }

    #[test]
    fn empty_or_garbage_payload_is_rejected() {
        assert!(matches!(
            parse_feed_bytes(b"  \n\t"),
            Err(FeedParseError::EmptyPayload)
        ));
        assert!(matches!(
            parse_feed_bytes(b"<html><body>login required</body></html>"),
            Err(FeedParseError::Feed(_))
        ));
    }

    #[test]
    fn prefers_alternate_link_over_others() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>t</title>
  <id>urn:feed</id>
  <updated>2026-02-24T10:15:00Z</updated>
  <entry>
    <title>Issue</title>
    <id>urn:entry</id>
    <link rel="edit" href="https://example.com/edit/1"/>
    <link rel="alternate" href="https://example.com/issues/1"/>
    <updated>2026-02-24T10:15:00Z</updated>
  </entry>
</feed>"#;
        let entries = parse_feed_bytes(xml).expect("feed must parse");
        assert_eq!(entries[0].link, "https://example.com/issues/1");
        assert_eq!(entries[0].author, "");
    }
}
