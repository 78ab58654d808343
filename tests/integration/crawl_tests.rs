//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small news site and run the full
//! crawl cycle end-to-end through `run_crawl`.

use chrono::NaiveDate;
use corpus_crawler::config::{
    Config, DownloaderConfig, ExtractorConfig, Settings, UserAgentConfig,
};
use corpus_crawler::crawler::run_crawl;
use corpus_crawler::output::ConverterKind;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a date-mode configuration for one day of archive on the mock server
fn create_test_config(server_uri: &str, dir: &Path) -> Config {
    Config {
        settings: Settings {
            archive_page_urls_by_date: true,
            archive_page_urls_by_id: false,
            date_from: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            date_until: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            archive_url_format: format!("{}/archive/#year/#month/#day", server_uri),
            go_reverse_in_archive: false,
            min_pagenum: 1,
            max_pagenum: None,
            next_url_by_regex: false,
            next_url_by_pagenum: false,
            same_article_url_threshold: 0,
            create_corpus: true,
            output_file: dir.join("corpus.jsonl"),
            log_file_archive: dir.join("archive.log"),
            log_file_articles: dir.join("articles.log"),
            known_bad_urls: None,
        },
        extractor: ExtractorConfig {
            article_url_pattern: format!(r"^{}/news/", regex::escape(server_uri)),
            article_link_selector: "a[href]".to_string(),
            next_page_pattern: None,
            article_date_pattern: None,
            article_date_format: "%Y-%m-%d".to_string(),
            title_selector: "h1".to_string(),
            article_body_selector: "article p".to_string(),
        },
        downloader: DownloaderConfig {
            error_threshold: 2,
            max_calls_in_period: 100,
            limit_period_ms: 1000,
            retry_delay_ms: 1,
            request_timeout_secs: 5,
            ..DownloaderConfig::default()
        },
        user_agent: UserAgentConfig::default(),
    }
}

fn archive_html(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<li><a href="{}">story</a></li>"#, l))
        .collect();
    format!(
        r#"<html><body><a href="/about">About</a><ul>{}</ul></body></html>"#,
        anchors
    )
}

fn article_html(date: &str, title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">related</a>"#, l))
        .collect();
    format!(
        r#"<html><head><meta property="article:published_time" content="{}T09:00:00Z"></head>
        <body><h1>{}</h1><article><p>Body of {}.</p></article><aside>{}</aside></body></html>"#,
        date, title, title, anchors
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

fn corpus_lines(config: &Config) -> Vec<serde_json::Value> {
    std::fs::read_to_string(&config.settings.output_file)
        .unwrap_or_default()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn test_date_archive_with_orphan_articles() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    mount_page(
        &server,
        "/archive/2020/01/15",
        archive_html(&["/news/a", "/news/b"]),
        1,
    )
    .await;
    mount_page(&server, "/news/a", article_html("2020-01-15", "A", &["/news/orphan"]), 1).await;
    mount_page(&server, "/news/b", article_html("2020-01-15", "B", &["/news/a"]), 1).await;
    mount_page(&server, "/news/orphan", article_html("2020-01-15", "Orphan", &[]), 1).await;

    let stats = run_crawl(&config, ConverterKind::RuleBased, None)
        .await
        .unwrap();

    assert_eq!(stats.archive_good, 1);
    assert_eq!(stats.article_good, 3);
    assert_eq!(stats.drain_passes, 1);
    assert_eq!(stats.corpus_records, 3);

    let records = corpus_lines(&config);
    assert_eq!(records.len(), 3);
    let titles: Vec<&str> = records.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["A", "B", "Orphan"]);
    assert_eq!(records[0]["text"], "Body of A.");
}

#[tokio::test]
async fn test_pagenum_archive_stops_on_empty_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path());
    config.settings.archive_page_urls_by_date = false;
    config.settings.archive_page_urls_by_id = true;
    config.settings.archive_url_format = format!("{}/archive/", server.uri());
    config.settings.next_url_by_pagenum = true;

    mount_page(&server, "/archive/", archive_html(&["/news/a"]), 1).await;
    mount_page(&server, "/archive/1", archive_html(&["/news/b"]), 1).await;
    mount_page(&server, "/archive/2", archive_html(&[]), 1).await;
    mount_page(&server, "/archive/3", archive_html(&["/news/never"]), 0).await;
    mount_page(&server, "/news/a", article_html("2020-01-15", "A", &[]), 1).await;
    mount_page(&server, "/news/b", article_html("2020-01-15", "B", &[]), 1).await;

    let stats = run_crawl(&config, ConverterKind::RuleBased, None)
        .await
        .unwrap();

    assert_eq!(stats.archive_good, 3);
    assert_eq!(stats.article_good, 2);
    assert_eq!(corpus_lines(&config).len(), 2);
}

#[tokio::test]
async fn test_failed_articles_are_problematic() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    mount_page(
        &server,
        "/archive/2020/01/15",
        archive_html(&["/news/gone", "/news/flaky", "/news/ok"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/news/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    mount_page(&server, "/news/ok", article_html("2020-01-15", "Ok", &[]), 1).await;

    let stats = run_crawl(&config, ConverterKind::RuleBased, None)
        .await
        .unwrap();

    assert_eq!(stats.article_good, 1);
    assert_eq!(stats.article_problematic, 2);
    let mut failed = stats.problematic_article_urls.clone();
    failed.sort();
    assert_eq!(
        failed,
        vec![
            format!("{}/news/flaky", server.uri()),
            format!("{}/news/gone", server.uri())
        ]
    );
}

#[tokio::test]
async fn test_out_of_window_article_is_scanned_but_not_written() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    mount_page(&server, "/archive/2020/01/15", archive_html(&["/news/old"]), 1).await;
    mount_page(&server, "/news/old", article_html("2019-03-01", "Old", &["/news/new"]), 1).await;
    mount_page(&server, "/news/new", article_html("2020-01-15", "New", &[]), 1).await;

    let stats = run_crawl(&config, ConverterKind::RuleBased, None)
        .await
        .unwrap();

    assert_eq!(stats.articles.date_misses, 1);
    let records = corpus_lines(&config);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "New");
}

#[tokio::test]
async fn test_known_urls_are_neither_fetched_nor_drained() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let known_path = dir.path().join("known.txt");
    std::fs::write(
        &known_path,
        format!("{}/news/listed\n\n{}/news/linked\n", server.uri(), server.uri()),
    )
    .unwrap();

    mount_page(
        &server,
        "/archive/2020/01/15",
        archive_html(&["/news/a", "/news/listed"]),
        1,
    )
    .await;
    mount_page(&server, "/news/a", article_html("2020-01-15", "A", &["/news/linked"]), 1).await;
    mount_page(&server, "/news/listed", article_html("2020-01-15", "L", &[]), 0).await;
    mount_page(&server, "/news/linked", article_html("2020-01-15", "K", &[]), 0).await;

    let stats = run_crawl(&config, ConverterKind::RuleBased, Some(&known_path))
        .await
        .unwrap();

    assert_eq!(stats.known_article_urls, 2);
    assert_eq!(stats.article_good, 1);
    // Listed on the archive, refused by the downloader without a request
    assert_eq!(stats.article_problematic, 1);
    assert_eq!(stats.drain_passes, 0);
}

#[tokio::test]
async fn test_page_cache_replays_second_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path());
    config.downloader.archive_cache = Some(dir.path().join("archive.db"));
    config.downloader.article_cache = Some(dir.path().join("articles.db"));

    mount_page(&server, "/archive/2020/01/15", archive_html(&["/news/a"]), 1).await;
    mount_page(&server, "/news/a", article_html("2020-01-15", "A", &[]), 1).await;

    let first = run_crawl(&config, ConverterKind::RuleBased, None)
        .await
        .unwrap();
    let second = run_crawl(&config, ConverterKind::RuleBased, None)
        .await
        .unwrap();

    assert_eq!(first.article_good, 1);
    assert_eq!(second.article_good, 1);
    // The corpus file is appended to, not truncated
    assert_eq!(corpus_lines(&config).len(), 2);
}

#[tokio::test]
async fn test_ml_based_converter() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    mount_page(&server, "/archive/2020/01/15", archive_html(&["/news/a"]), 1).await;
    mount_page(
        &server,
        "/news/a",
        r#"<html><head><meta name="date" content="2020-01-15"></head><body>
            <div class="story-content"><h1>Harbour reopens</h1>
            <p>The harbour reopened on Monday, weeks after the storm closed it.</p>
            <p>Fishing crews returned to the docks before dawn, ready to work.</p></div>
            <div class="comments"><p>Great news, finally some good news this week!</p></div>
        </body></html>"#
            .to_string(),
        1,
    )
    .await;

    let stats = run_crawl(&config, ConverterKind::MlBased, None)
        .await
        .unwrap();

    assert_eq!(stats.corpus_records, 1);
    let records = corpus_lines(&config);
    assert_eq!(records[0]["extractor"], "ml-based");
    assert_eq!(records[0]["title"], "Harbour reopens");
    let text = records[0]["text"].as_str().unwrap();
    assert!(text.contains("harbour reopened"));
    assert!(!text.contains("Great news"));
}

#[tokio::test]
async fn test_no_archive_mode_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path());
    config.settings.archive_page_urls_by_date = false;

    let result = run_crawl(&config, ConverterKind::RuleBased, None).await;

    assert!(matches!(
        result,
        Err(corpus_crawler::CrawlerError::Config(
            corpus_crawler::ConfigError::NoArchiveMode
        ))
    ));
}
