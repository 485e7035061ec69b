use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of the syndication feed, as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub link: String,
    pub title: String,
    pub published: DateTime<Utc>,
}

/// An accepted job listing. `link` is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub link: String,
    pub title: String,
    pub published: DateTime<Utc>,
}

impl Job {
    pub fn new(link: impl Into<String>, title: impl Into<String>, published: DateTime<Utc>) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            published,
        }
    }
}

impl From<RawEntry> for Job {
    fn from(entry: RawEntry) -> Self {
        Self {
            link: entry.link,
            title: entry.title,
            published: entry.published,
        }
    }
}
