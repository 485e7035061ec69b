use std::collections::HashSet;
use std::sync::Arc;

use careers_core::{filter_entries, Job, LocationError, Region};
use careers_logging::{careers_debug, careers_info, careers_warn};
use thiserror::Error;

use crate::config::SyncConfig;
use crate::fetch::Fetcher;
use crate::store::{JobStore, StoreError};
use crate::{FetchError, InsertOutcome};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("location parse failed: {0}")]
    Location(#[from] LocationError),
    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Most recent jobs, newest first, at most `recent_limit` long.
    pub jobs: Vec<Job>,
    pub fetched: usize,
    pub filtered_out: usize,
    pub inserted: usize,
    /// Entries the store already held although the working list did not.
    pub already_present: usize,
}

/// Fetch, filter by region, merge into the store, report the recent jobs.
pub struct SyncPipeline {
    config: SyncConfig,
    region: Region,
    fetcher: Arc<dyn Fetcher>,
}

impl SyncPipeline {
    pub fn new(config: SyncConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let region = config.region();
        Self {
            config,
            region,
            fetcher,
        }
    }

    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let limit = self.config.recent_limit;

        // Dropped without commit on any early return below, which rolls back.
        let store = JobStore::initialize(&self.config.store_path)?;
        let mut working = store.recent(limit)?;
        careers_debug!("Loaded {} stored jobs from {:?}", working.len(), store.path());

        let entries = self.fetcher.fetch_entries(&self.config.feed_url).await?;
        let fetched = entries.len();
        let mut kept = filter_entries(entries, &self.region, self.config.on_parse_failure)?;
        let filtered_out = fetched - kept.len();
        careers_info!(
            "Kept {} of {} feed entries for the configured region",
            kept.len(),
            fetched
        );

        // Walk the batch backwards, oldest first; ties keep that reversed order.
        // Prepending then leaves the newest at the front.
        kept.reverse();
        kept.sort_by_key(|job| job.published);

        let mut seen: HashSet<String> = working.iter().map(|job| job.link.clone()).collect();
        let mut inserted = 0;
        let mut already_present = 0;
        for job in kept {
            if !seen.insert(job.link.clone()) {
                continue;
            }
            match store.insert(&job)? {
                InsertOutcome::Inserted => inserted += 1,
                InsertOutcome::AlreadyExists => {
                    careers_warn!("Job {} was stored but not among the recent jobs", job.link);
                    already_present += 1;
                }
            }
            working.insert(0, job);
        }

        store.commit_and_close()?;
        careers_info!("Stored {} new job(s), {} already present", inserted, already_present);

        working.truncate(limit);
        Ok(SyncReport {
            jobs: working,
            fetched,
            filtered_out,
            inserted,
            already_present,
        })
    }
}
