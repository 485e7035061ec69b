//! Fetch the job feed, keep the European listings, and render the site.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use careers_engine::{ReqwestFetcher, SiteContext, StaticSiteWriter, SyncConfig, SyncPipeline};
use careers_logging::{careers_error, careers_info, LogDestination};
use log::LevelFilter;

const CONFIG_PATH: &str = "careers.ron";
const LOG_PATH: &str = "careers.log";

fn main() {
    let log_path = Path::new(LOG_PATH);
    if let Err(err) = careers_logging::initialize(LogDestination::Both, LevelFilter::Info, log_path) {
        eprintln!("warning: {err}; logging to the terminal only");
        if let Err(err) =
            careers_logging::initialize(LogDestination::Terminal, LevelFilter::Info, log_path)
        {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    if let Err(err) = run() {
        careers_error!("Run failed: {:#}", err);
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = SyncConfig::load(Path::new(CONFIG_PATH))?;
    let site_dir = config.site_dir.clone();
    let fetcher =
        ReqwestFetcher::new(config.fetch.clone()).context("failed to build HTTP client")?;
    let fetcher = Arc::new(fetcher);
    let pipeline = SyncPipeline::new(config, fetcher);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let report = runtime
        .block_on(pipeline.sync())
        .context("job sync failed")?;
    careers_info!(
        "Sync done: {} fetched, {} filtered out, {} new, {} listed",
        report.fetched,
        report.filtered_out,
        report.inserted,
        report.jobs.len()
    );

    let ctx = SiteContext {
        jobs: report.jobs,
        generated_at: chrono::Utc::now(),
    };
    let summary = StaticSiteWriter::new(site_dir)
        .render(&ctx)
        .context("failed to render site")?;
    careers_info!(
        "Rendered {} job(s) to {:?}",
        summary.job_count,
        summary.index_path
    );
    Ok(())
}
