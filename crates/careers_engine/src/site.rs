use std::path::PathBuf;

use askama::Template;
use careers_core::Job;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::persist::{AtomicFileWriter, PersistError};

pub const INDEX_FILENAME: &str = "index.html";
pub const MANIFEST_FILENAME: &str = "jobs.json";

/// What the renderer receives from a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    pub jobs: Vec<Job>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub job_count: usize,
    pub index_path: PathBuf,
    pub manifest_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

struct JobItem<'a> {
    link: &'a str,
    title: &'a str,
    published: String,
    published_day: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    jobs: Vec<JobItem<'a>>,
    generated_at: String,
}

#[derive(Serialize)]
struct Manifest<'a> {
    generated_at: String,
    job_count: usize,
    jobs: &'a [Job],
}

/// Renders the job list as `index.html` plus a `jobs.json` manifest.
#[derive(Debug, Clone)]
pub struct StaticSiteWriter {
    writer: AtomicFileWriter,
}

impl StaticSiteWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn render(&self, ctx: &SiteContext) -> Result<SiteSummary, SiteError> {
        let generated_at = ctx.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

        let page = IndexPage {
            jobs: ctx
                .jobs
                .iter()
                .map(|job| JobItem {
                    link: &job.link,
                    title: &job.title,
                    published: job.published.to_rfc3339_opts(SecondsFormat::Secs, true),
                    published_day: job.published.format("%Y-%m-%d").to_string(),
                })
                .collect(),
            generated_at: generated_at.clone(),
        };
        let index_path = self.writer.write(INDEX_FILENAME, page.render()?.as_bytes())?;

        let manifest = Manifest {
            generated_at,
            job_count: ctx.jobs.len(),
            jobs: &ctx.jobs,
        };
        let manifest_path = self.writer.write_json(MANIFEST_FILENAME, &manifest)?;

        Ok(SiteSummary {
            job_count: ctx.jobs.len(),
            index_path,
            manifest_path,
        })
    }
}
