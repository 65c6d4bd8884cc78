use chrono::{DateTime, Utc};

/// An item as read from the feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub author: String,
    pub link: String,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A feed item recent enough to be forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    pub title: String,
    pub author: String,
    pub link: String,
}

impl From<FeedEntry> for CandidateEntry {
    fn from(entry: FeedEntry) -> Self {
        Self {
            title: entry.title,
            author: entry.author,
            link: entry.link,
        }
    }
}
