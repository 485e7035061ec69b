//! Careers engine: feed fetching, job store, sync pipeline and site output.
mod config;
mod feed;
mod fetch;
mod persist;
mod pipeline;
mod site;
mod store;
mod types;

pub use config::{ConfigError, SyncConfig, DEFAULT_FEED_URL, DEFAULT_RECENT_LIMIT};
pub use feed::parse_feed;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use pipeline::{SyncError, SyncPipeline, SyncReport};
pub use site::{SiteContext, SiteError, SiteSummary, StaticSiteWriter, INDEX_FILENAME, MANIFEST_FILENAME};
pub use store::{JobStore, StoreError};
pub use types::{FailureKind, FetchError, InsertOutcome};
