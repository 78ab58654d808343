use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for corpus-crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub settings: Settings,
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub user_agent: UserAgentConfig,
}

/// Site settings driving archive traversal and article filtering
///
/// Loaded once and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Generate one archive base URL per day of the date window
    #[serde(default)]
    pub archive_page_urls_by_date: bool,

    /// Use `archive_url_format` verbatim as the single base URL
    #[serde(default)]
    pub archive_page_urls_by_id: bool,

    /// First day of the window (inclusive)
    pub date_from: NaiveDate,

    /// Last day of the window (inclusive)
    pub date_until: NaiveDate,

    /// Archive URL template with `#year`, `#month` and `#day` placeholders
    pub archive_url_format: String,

    /// Walk the generated base URLs in descending order
    #[serde(default)]
    pub go_reverse_in_archive: bool,

    /// Page number appended to the base URL for the second page
    #[serde(default = "default_min_pagenum")]
    pub min_pagenum: u32,

    /// Upper bound for pagenum pagination (unbounded when absent)
    #[serde(default)]
    pub max_pagenum: Option<u32>,

    /// Follow an explicit "next page" link found by the extractor
    #[serde(default)]
    pub next_url_by_regex: bool,

    /// Synthesize next page URLs by appending an incrementing counter
    #[serde(default)]
    pub next_url_by_pagenum: bool,

    /// Overlap with known article URLs required to keep paginating
    #[serde(default)]
    pub same_article_url_threshold: usize,

    /// Write eligible articles to the corpus
    #[serde(default = "default_true")]
    pub create_corpus: bool,

    /// Corpus output file (JSON lines, appended)
    pub output_file: PathBuf,

    /// Log file for archive traversal events (appended)
    pub log_file_archive: PathBuf,

    /// Log file for article processing events (appended)
    pub log_file_articles: PathBuf,

    /// Newline-delimited list of known URLs
    #[serde(default)]
    pub known_bad_urls: Option<PathBuf>,
}

/// Extraction heuristics for links, pagination and dates
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Regex an absolute link URL must match to count as an article
    pub article_url_pattern: String,

    /// CSS selector for candidate article links
    #[serde(default = "default_link_selector")]
    pub article_link_selector: String,

    /// Regex over raw archive HTML; capture group `url` (or 1) is the next page
    #[serde(default)]
    pub next_page_pattern: Option<String>,

    /// Regex over raw article HTML; capture group `date` (or 1) is the date
    #[serde(default)]
    pub article_date_pattern: Option<String>,

    /// chrono format used to parse the captured date
    #[serde(default = "default_date_format")]
    pub article_date_format: String,

    /// CSS selector for the article title
    #[serde(default = "default_title_selector")]
    pub title_selector: String,

    /// CSS selector for the article body paragraphs
    #[serde(default = "default_body_selector")]
    pub article_body_selector: String,
}

/// HTTP downloader behavior
#[derive(Debug, Clone, Deserialize)]
pub struct DownloaderConfig {
    /// SQLite page cache for archive pages
    #[serde(default)]
    pub archive_cache: Option<PathBuf>,

    /// SQLite page cache for article pages
    #[serde(default)]
    pub article_cache: Option<PathBuf>,

    /// Maximum attempts per URL before giving up
    #[serde(default = "default_error_threshold")]
    pub error_threshold: u32,

    /// Requests allowed within one limit period
    #[serde(default = "default_max_calls_in_period")]
    pub max_calls_in_period: u32,

    /// Length of the rate limit window (milliseconds)
    #[serde(default = "default_limit_period_ms")]
    pub limit_period_ms: u64,

    /// Delay before retrying a transient failure (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Proxy for all requests
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Keep cookies between requests
    #[serde(default)]
    pub allow_cookies: bool,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            archive_cache: None,
            article_cache: None,
            error_threshold: default_error_threshold(),
            max_calls_in_period: default_max_calls_in_period(),
            limit_period_ms: default_limit_period_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            proxy_url: None,
            allow_cookies: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        let mut value = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => value.push_str(&format!(" (+{}; {})", url, email)),
            (Some(url), None) => value.push_str(&format!(" (+{})", url)),
            (None, Some(email)) => value.push_str(&format!(" ({})", email)),
            (None, None) => {}
        }
        value
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "corpus-crawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_pagenum() -> u32 {
    1
}

fn default_link_selector() -> String {
    "a[href]".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_title_selector() -> String {
    "h1".to_string()
}

fn default_body_selector() -> String {
    "article p".to_string()
}

fn default_error_threshold() -> u32 {
    10
}

fn default_max_calls_in_period() -> u32 {
    2
}

fn default_limit_period_ms() -> u64 {
    1000
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_header_with_contacts() {
        let ua = UserAgentConfig {
            crawler_name: "NewsBot".to_string(),
            crawler_version: "2.1".to_string(),
            contact_url: Some("https://example.com/bot".to_string()),
            contact_email: Some("bot@example.com".to_string()),
        };
        assert_eq!(
            ua.header_value(),
            "NewsBot/2.1 (+https://example.com/bot; bot@example.com)"
        );
    }

    #[test]
    fn test_user_agent_header_without_contacts() {
        let ua = UserAgentConfig {
            crawler_name: "NewsBot".to_string(),
            crawler_version: "2.1".to_string(),
            contact_url: None,
            contact_email: None,
        };
        assert_eq!(ua.header_value(), "NewsBot/2.1");
    }

    #[test]
    fn test_downloader_defaults() {
        let config = DownloaderConfig::default();
        assert_eq!(config.error_threshold, 10);
        assert_eq!(config.max_calls_in_period, 2);
        assert_eq!(config.limit_period_ms, 1000);
        assert!(config.archive_cache.is_none());
    }
}
