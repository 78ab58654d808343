//! Configuration module for corpus-crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use corpus_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site.toml")).unwrap();
//! println!("Crawling from {} to {}", config.settings.date_from, config.settings.date_until);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DownloaderConfig, ExtractorConfig, Settings, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_url_list};

/// Minimal valid configuration shared by unit tests
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    use chrono::NaiveDate;
    use std::path::PathBuf;

    Config {
        settings: Settings {
            archive_page_urls_by_date: true,
            archive_page_urls_by_id: false,
            date_from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            date_until: NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
            archive_url_format: "https://news.example.com/archive/#year/#month/#day".to_string(),
            go_reverse_in_archive: false,
            min_pagenum: 1,
            max_pagenum: None,
            next_url_by_regex: false,
            next_url_by_pagenum: false,
            same_article_url_threshold: 0,
            create_corpus: true,
            output_file: PathBuf::from("./corpus.jsonl"),
            log_file_archive: PathBuf::from("./archive.log"),
            log_file_articles: PathBuf::from("./articles.log"),
            known_bad_urls: None,
        },
        extractor: ExtractorConfig {
            article_url_pattern: r"^https://news\.example\.com/\d{4}/".to_string(),
            article_link_selector: "a[href]".to_string(),
            next_page_pattern: None,
            article_date_pattern: None,
            article_date_format: "%Y-%m-%d".to_string(),
            title_selector: "h1".to_string(),
            article_body_selector: "article p".to_string(),
        },
        downloader: DownloaderConfig::default(),
        user_agent: UserAgentConfig::default(),
    }
}
