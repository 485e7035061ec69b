mod common;

use std::path::Path;
use std::sync::Arc;

use careers_core::{Job, LocationError, ParseFailurePolicy};
use careers_engine::{
    FailureKind, FetchSettings, JobStore, ReqwestFetcher, SyncConfig, SyncError, SyncPipeline,
};
use common::{at, item, rss, serve_feed, Item};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    careers_logging::initialize_for_tests();
}

fn pipeline(server: &MockServer, store_path: &Path) -> SyncPipeline {
    pipeline_with(server, store_path, |_| {})
}

fn pipeline_with(
    server: &MockServer,
    store_path: &Path,
    tweak: impl FnOnce(&mut SyncConfig),
) -> SyncPipeline {
    let mut config = SyncConfig {
        feed_url: format!("{}/feed", server.uri()),
        store_path: store_path.to_path_buf(),
        ..SyncConfig::default()
    };
    tweak(&mut config);
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap());
    SyncPipeline::new(config, fetcher)
}

fn links(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|job| job.link.as_str()).collect()
}

fn stored(store_path: &Path) -> (u64, Vec<Job>) {
    let store = JobStore::initialize(store_path).unwrap();
    let count = store.count().unwrap();
    let jobs = store.recent(100).unwrap();
    store.commit_and_close().unwrap();
    (count, jobs)
}

fn mixed_feed() -> String {
    rss(&[
        item("Backend Engineer (Berlin, Germany)", "http://x/1", at(23, 12)),
        item("Dev (Austin, TX)", "http://x/2", at(22, 12)),
        item("Ops (Lisbon, Portugal)", "http://x/3", at(21, 12)),
        item("Analyst (London, England, United Kingdom)", "http://x/4", at(20, 12)),
        item("QA (Toronto, ON, Canada)", "http://x/5", at(19, 12)),
    ])
}

#[tokio::test]
async fn sync_keeps_european_jobs_newest_first() {
    init_logging();
    let server = MockServer::start().await;
    serve_feed(&server, "/feed", mixed_feed()).await;
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let report = pipeline(&server, &store_path).sync().await.unwrap();

    assert_eq!(links(&report.jobs), vec!["http://x/1", "http://x/3", "http://x/4"]);
    assert_eq!(report.fetched, 5);
    assert_eq!(report.filtered_out, 2);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.already_present, 0);

    let (count, jobs) = stored(&store_path);
    assert_eq!(count, 3);
    assert_eq!(links(&jobs), vec!["http://x/1", "http://x/3", "http://x/4"]);
}

#[tokio::test]
async fn second_sync_with_same_feed_is_idempotent() {
    init_logging();
    let server = MockServer::start().await;
    serve_feed(&server, "/feed", mixed_feed()).await;
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");
    let pipeline = pipeline(&server, &store_path);

    let first = pipeline.sync().await.unwrap();
    let second = pipeline.sync().await.unwrap();

    assert_eq!(second.inserted, 0);
    assert_eq!(second.already_present, 0);
    assert_eq!(links(&second.jobs), links(&first.jobs));
    let (count, _) = stored(&store_path);
    assert_eq!(count, 3);
}

#[tokio::test]
async fn new_entries_are_merged_ahead_of_stored_ones() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let store = JobStore::initialize(&store_path).unwrap();
    store
        .insert(&Job::new("http://x/old", "Dev (Madrid, Spain)", at(10, 12)))
        .unwrap();
    store.commit_and_close().unwrap();

    let server = MockServer::start().await;
    serve_feed(
        &server,
        "/feed",
        rss(&[
            item("Dev (Vienna, Austria)", "http://x/new2", at(12, 12)),
            item("Dev (Madrid, Spain)", "http://x/old", at(10, 12)),
            item("Dev (Athens, Greece)", "http://x/new1", at(11, 12)),
        ]),
    )
    .await;

    let report = pipeline(&server, &store_path).sync().await.unwrap();
    assert_eq!(
        links(&report.jobs),
        vec!["http://x/new2", "http://x/new1", "http://x/old"]
    );
    assert_eq!(report.inserted, 2);
    assert_eq!(stored(&store_path).0, 3);
}

#[tokio::test]
async fn result_is_bounded_by_recent_limit() {
    init_logging();
    let server = MockServer::start().await;
    let links_owned: Vec<String> = (1..=30).map(|i| format!("http://x/{i}")).collect();
    let items: Vec<Item<'_>> = links_owned
        .iter()
        .enumerate()
        .map(|(i, link)| item("Dev (Dublin, Ireland)", link.as_str(), at(1 + i as u32, 6)))
        .collect();
    serve_feed(&server, "/feed", rss(&items)).await;
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let report = pipeline(&server, &store_path).sync().await.unwrap();

    assert_eq!(report.jobs.len(), 25);
    assert_eq!(report.jobs[0].link, "http://x/30");
    assert_eq!(report.jobs[24].link, "http://x/6");
    assert!(report
        .jobs
        .windows(2)
        .all(|pair| pair[0].published >= pair[1].published));
    assert_eq!(stored(&store_path).0, 30);

    let again = pipeline(&server, &store_path).sync().await.unwrap();
    assert_eq!(again.jobs.len(), 25);
    assert_eq!(again.inserted, 0);
}

#[tokio::test]
async fn stored_job_outside_recent_window_is_not_duplicated() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let store = JobStore::initialize(&store_path).unwrap();
    store
        .insert(&Job::new("http://x/a", "Dev (Oslo, Norway)", at(1, 12)))
        .unwrap();
    store
        .insert(&Job::new("http://x/b", "Dev (Oslo, Norway)", at(2, 12)))
        .unwrap();
    store.commit_and_close().unwrap();

    let server = MockServer::start().await;
    serve_feed(
        &server,
        "/feed",
        rss(&[item("Dev (Oslo, Norway)", "http://x/a", at(1, 12))]),
    )
    .await;

    let report = pipeline_with(&server, &store_path, |config| config.recent_limit = 1)
        .sync()
        .await
        .unwrap();

    assert_eq!(report.inserted, 0);
    assert_eq!(report.already_present, 1);
    assert_eq!(report.jobs.len(), 1);
    assert_eq!(stored(&store_path).0, 2);
}

#[tokio::test]
async fn unparsable_title_aborts_before_any_write() {
    init_logging();
    let server = MockServer::start().await;
    serve_feed(
        &server,
        "/feed",
        rss(&[
            item("Backend Engineer (Berlin, Germany)", "http://x/1", at(23, 12)),
            item("Remote anywhere", "http://x/2", at(22, 12)),
        ]),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let err = pipeline(&server, &store_path).sync().await.unwrap_err();
    match err {
        SyncError::Location(LocationError::NoLocation(title)) => {
            assert_eq!(title, "Remote anywhere")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(stored(&store_path).0, 0);
}

#[tokio::test]
async fn skip_policy_drops_unparsable_titles() {
    init_logging();
    let server = MockServer::start().await;
    serve_feed(
        &server,
        "/feed",
        rss(&[
            item("Backend Engineer (Berlin, Germany)", "http://x/1", at(23, 12)),
            item("Remote anywhere", "http://x/2", at(22, 12)),
        ]),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let report = pipeline_with(&server, &store_path, |config| {
        config.on_parse_failure = ParseFailurePolicy::Skip
    })
    .sync()
    .await
    .unwrap();

    assert_eq!(links(&report.jobs), vec!["http://x/1"]);
    assert_eq!(report.filtered_out, 1);
}

#[tokio::test]
async fn fetch_failure_leaves_store_untouched() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let store = JobStore::initialize(&store_path).unwrap();
    store
        .insert(&Job::new("http://x/kept", "Dev (Rome, Italy)", at(5, 12)))
        .unwrap();
    store.commit_and_close().unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = pipeline(&server, &store_path).sync().await.unwrap_err();
    match err {
        SyncError::Fetch(fetch) => assert_eq!(fetch.kind, FailureKind::HttpStatus(503)),
        other => panic!("unexpected error: {other}"),
    }

    let (count, jobs) = stored(&store_path);
    assert_eq!(count, 1);
    assert_eq!(links(&jobs), vec!["http://x/kept"]);
}

#[tokio::test]
async fn entries_published_together_keep_feed_order() {
    init_logging();
    let server = MockServer::start().await;
    serve_feed(
        &server,
        "/feed",
        rss(&[
            item("Dev (Berlin, Germany)", "http://x/a", at(15, 9)),
            item("Dev (Paris, France)", "http://x/b", at(15, 9)),
        ]),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let report = pipeline(&server, &store_path).sync().await.unwrap();
    assert_eq!(links(&report.jobs), vec!["http://x/a", "http://x/b"]);
}

#[tokio::test]
async fn repeated_link_in_one_feed_is_stored_once() {
    init_logging();
    let server = MockServer::start().await;
    serve_feed(
        &server,
        "/feed",
        rss(&[
            item("Senior Dev (Oslo, Norway)", "http://x/1", at(22, 12)),
            item("Ops (Bergen, Norway)", "http://x/2", at(21, 12)),
            item("Dev (Oslo, Norway)", "http://x/1", at(20, 12)),
        ]),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("jobs.db");

    let report = pipeline(&server, &store_path).sync().await.unwrap();
    assert_eq!(links(&report.jobs), vec!["http://x/2", "http://x/1"]);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.already_present, 0);

    let (count, jobs) = stored(&store_path);
    assert_eq!(count, 2);
    let first = jobs.iter().find(|job| job.link == "http://x/1").unwrap();
    // The older entry is processed first and is never updated afterwards.
    assert_eq!(first.title, "Dev (Oslo, Norway)");
    assert_eq!(first.published, at(20, 12));
}
