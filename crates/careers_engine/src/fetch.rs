use std::time::Duration;

use careers_core::RawEntry;
use careers_logging::{careers_debug, careers_info};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::feed::parse_feed;
use crate::{FailureKind, FetchError};

const FEED_ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/feed+json, application/xml;q=0.9, text/xml;q=0.9";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Upper bound for the feed document, in bytes.
    pub max_bytes: u64,
    /// Media types accepted as a feed. A response without `Content-Type` is accepted too.
    pub feed_media_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            feed_media_types: [
                "application/rss+xml",
                "application/atom+xml",
                "application/xml",
                "text/xml",
                "application/feed+json",
                "application/json",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Source of feed entries. One call, one fresh download; nothing is cached.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_entries(&self, url: &str) -> Result<Vec<RawEntry>, FetchError>;
}

/// Downloads the feed over HTTP with one shared client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("careers-europe/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(Policy::limited(settings.redirect_limit))
            .build()?;
        Ok(Self { client, settings })
    }

    /// The raw feed document behind `url`.
    pub async fn download_feed(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self.client.get(url).header(ACCEPT, FEED_ACCEPT).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        self.ensure_feed_media_type(response.headers())?;

        let document = self.read_document(response).await?;
        careers_debug!("Feed document is {} bytes", document.len());
        Ok(document)
    }

    fn ensure_feed_media_type(&self, headers: &HeaderMap) -> Result<(), FetchError> {
        let Some(raw) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return Ok(());
        };
        let media_type = raw.split(';').next().unwrap_or_default().trim();
        let is_feed = self
            .settings
            .feed_media_types
            .iter()
            .any(|known| known.eq_ignore_ascii_case(media_type));
        if is_feed {
            Ok(())
        } else {
            Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: media_type.to_string(),
                },
                "not a feed document",
            ))
        }
    }

    /// Read the body chunk by chunk, giving up as soon as it outgrows `max_bytes`.
    async fn read_document(&self, mut response: Response) -> Result<Vec<u8>, FetchError> {
        let limit = self.settings.max_bytes;
        let declared = response.content_length();
        if let Some(len) = declared.filter(|len| *len > limit) {
            return Err(too_large(limit, len));
        }

        let mut document = Vec::with_capacity(declared.unwrap_or(0) as usize);
        while let Some(chunk) = response.chunk().await? {
            let len = (document.len() + chunk.len()) as u64;
            if len > limit {
                return Err(too_large(limit, len));
            }
            document.extend_from_slice(&chunk);
        }
        Ok(document)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_entries(&self, url: &str) -> Result<Vec<RawEntry>, FetchError> {
        let document = self.download_feed(url).await?;
        let entries = parse_feed(&document)?;
        careers_info!("Fetched {} feed entries from {}", entries.len(), url);
        Ok(entries)
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "feed document too large",
    )
}
