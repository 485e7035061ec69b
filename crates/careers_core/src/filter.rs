use careers_logging::{careers_debug, careers_warn};
use serde::{Deserialize, Serialize};

use crate::{parse_location, Job, LocationError, RawEntry, Region};

/// What to do with a feed entry whose title carries no recognizable location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseFailurePolicy {
    /// Fail the whole batch with the first [`LocationError`].
    #[default]
    Abort,
    /// Log and drop the entry.
    Skip,
}

/// Keep the entries whose parsed country is in `region`, preserving input order.
pub fn filter_entries(
    entries: Vec<RawEntry>,
    region: &Region,
    on_parse_failure: ParseFailurePolicy,
) -> Result<Vec<Job>, LocationError> {
    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        let location = match parse_location(&entry.title) {
            Ok(location) => location,
            Err(err) => match on_parse_failure {
                ParseFailurePolicy::Abort => return Err(err),
                ParseFailurePolicy::Skip => {
                    careers_warn!("Skipping entry {}: {}", entry.link, err);
                    continue;
                }
            },
        };

        if region.contains(&location.country) {
            kept.push(Job::from(entry));
        } else {
            careers_debug!("Dropping entry {} located in {}", entry.link, location.country);
        }
    }
    Ok(kept)
}
