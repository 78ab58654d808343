//! Collaborator interfaces consumed by the crawl core
//!
//! The core never touches the network or parses HTML itself; it drives a
//! `Downloader` and an `Extractor` and only observes their results.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a page could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("URL is on the known-bad list: {url}")]
    KnownBad { url: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Giving up on {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// Retrieves page content
///
/// Implementations own caching, rate limiting and retries; callers only see
/// the body or the failure.
#[allow(async_fn_in_trait)]
pub trait Downloader {
    /// Fetches a URL and returns its body
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError>;
}

/// Extracts links and metadata from raw page content
///
/// `page_url` is the URL the content was fetched from, used to resolve
/// relative links.
pub trait Extractor {
    /// Article URLs linked from the page, deduplicated, in document order
    fn article_urls(&self, page_url: &str, content: &str) -> Vec<String>;

    /// Explicit "next page" link of an archive page
    fn next_page_url(&self, page_url: &str, content: &str) -> Option<String>;

    /// Publication date of an article
    fn article_date(&self, content: &str) -> Option<NaiveDate>;
}
