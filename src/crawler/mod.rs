//! Crawler module for archive traversal and article processing
//!
//! This module contains the core crawling logic, including:
//! - Archive base URL generation and pagination
//! - Article download, date filtering and link harvesting
//! - The drain of article URLs found only through in-article links
//! - HTTP fetching with caching, rate limiting and retries
//! - HTML link and metadata extraction

mod archive;
mod articles;
mod coordinator;
mod fetcher;
mod pagination;
mod parser;
mod rate_limit;
mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::{format_archive_url, generate_archive_base_urls};
pub use articles::{ArticleOutcome, ArticleProcessor, ProcessStats};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, HttpDownloader};
pub use pagination::{NextPageResolver, PaginationWalker, WalkState};
pub use parser::RegexExtractor;
pub use rate_limit::RateLimiter;
pub use traits::{Downloader, Extractor, FetchError};

/// Tracing target for archive traversal, routed to the archive log file
pub const ARCHIVE_LOG: &str = "archive";

/// Tracing target for article processing, routed to the articles log file
pub const ARTICLES_LOG: &str = "articles";
