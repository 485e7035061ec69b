use careers_core::RawEntry;
use feed_rs::model::Entry;

use crate::{FailureKind, FetchError};

/// Parse an RSS, Atom or JSON Feed document into entries, in document order.
///
/// Every entry must carry a link, a title and a published (or, failing that,
/// updated) time.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>, FetchError> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|err| FetchError::new(FailureKind::InvalidFeed, err.to_string()))?;

    feed.entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| to_raw_entry(index, entry))
        .collect()
}

fn to_raw_entry(index: usize, entry: Entry) -> Result<RawEntry, FetchError> {
    let malformed = |what: &str| {
        FetchError::new(
            FailureKind::MalformedEntry { index },
            format!("entry {:?} has no {what}", entry.id),
        )
    };

    let link = entry
        .links
        .first()
        .map(|link| link.href.clone())
        .ok_or_else(|| malformed("link"))?;
    let title = entry
        .title
        .as_ref()
        .map(|text| text.content.clone())
        .ok_or_else(|| malformed("title"))?;
    let published = entry
        .published
        .or(entry.updated)
        .ok_or_else(|| malformed("published time"))?;

    Ok(RawEntry {
        link,
        title,
        published,
    })
}
