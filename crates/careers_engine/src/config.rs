use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use careers_core::{ParseFailurePolicy, Region, EUROPE};
use careers_logging::careers_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchSettings;

pub const DEFAULT_FEED_URL: &str = "http://careers.stackoverflow.com/jobs/feed";
pub const DEFAULT_RECENT_LIMIT: usize = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Everything one sync run needs. Every field has a default, so a RON file
/// only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub feed_url: String,
    pub allow_list: Vec<String>,
    pub store_path: PathBuf,
    pub recent_limit: usize,
    pub site_dir: PathBuf,
    pub on_parse_failure: ParseFailurePolicy,
    pub fetch: FetchSettings,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            allow_list: EUROPE.iter().map(|c| c.to_string()).collect(),
            store_path: PathBuf::from("jobs.db"),
            recent_limit: DEFAULT_RECENT_LIMIT,
            site_dir: PathBuf::from("site"),
            on_parse_failure: ParseFailurePolicy::Abort,
            fetch: FetchSettings::default(),
        }
    }
}

impl SyncConfig {
    /// Load from a RON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                careers_info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        careers_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn region(&self) -> Region {
        Region::new(self.allow_list.iter().cloned())
    }
}
