//! Corpus-crawler: an archive-driven news crawler
//!
//! This crate walks a news site's dated or paginated archive to enumerate
//! article URLs, downloads those articles, follows in-article links to
//! articles the archive does not reach, and writes the extracted text to a
//! corpus file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for corpus-crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error(
        "No archive base URLs: neither archive_page_urls_by_date nor archive_page_urls_by_id produced any"
    )]
    NoArchiveMode,
}

/// Result type alias for corpus-crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, Settings};
pub use crawler::{Coordinator, Downloader, Extractor};
pub use output::{ConverterKind, CorpusConverter, CrawlStatistics};
pub use state::{UrlClass, UrlFrontier};
