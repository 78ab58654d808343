//! HTTP downloader implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Short-circuiting URLs on the known-bad list
//! - Replaying bodies from the page cache
//! - Rate limiting and retry logic for transient failures

use crate::config::{DownloaderConfig, UserAgentConfig};
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::traits::{Downloader, FetchError};
use crate::storage::{PageCache, SqlitePageCache};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `config` - Timeouts, proxy and cookie settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. a bad proxy URL)
///
/// # Example
///
/// ```no_run
/// use corpus_crawler::config::{DownloaderConfig, UserAgentConfig};
/// use corpus_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &DownloaderConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    config: &DownloaderConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .cookie_store(config.allow_cookies);

    if let Some(proxy_url) = &config.proxy_url {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Outcome of a single request attempt
enum Attempt {
    Body(String),
    Retry(String),
    Fail(FetchError),
}

/// Downloader backed by reqwest
///
/// # Request Flow
///
/// 1. URL on the known-bad list → `FetchError::KnownBad`, no I/O
/// 2. Body in the page cache → returned without a request
/// 3. GET, paced by the rate limiter, up to `max_attempts` times
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Success, body is cached |
/// | HTTP 429 | Retry after `retry_delay` |
/// | HTTP 5xx | Retry after `retry_delay` |
/// | Other HTTP status | Immediate failure |
/// | Timeout, connection error | Retry after `retry_delay` |
/// | Malformed request | Immediate failure |
pub struct HttpDownloader {
    client: Client,
    cache: Option<SqlitePageCache>,
    limiter: RateLimiter,
    known_bad: Arc<HashSet<String>>,
    max_attempts: u32,
    retry_delay: Duration,

    /// "archive" or "article", for log lines
    role: &'static str,

    network_requests: u64,
    cache_hits: u64,
}

impl HttpDownloader {
    /// Creates a downloader without cache or known-bad list
    pub fn new(client: Client, config: &DownloaderConfig, role: &'static str) -> Self {
        Self {
            client,
            cache: None,
            limiter: RateLimiter::new(
                config.max_calls_in_period,
                Duration::from_millis(config.limit_period_ms),
            ),
            known_bad: Arc::new(HashSet::new()),
            max_attempts: config.error_threshold.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            role,
            network_requests: 0,
            cache_hits: 0,
        }
    }

    /// Attaches a page cache
    pub fn with_cache(mut self, cache: SqlitePageCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attaches the known-bad URL list
    pub fn with_known_bad(mut self, known_bad: Arc<HashSet<String>>) -> Self {
        self.known_bad = known_bad;
        self
    }

    /// Number of requests that went to the network
    pub fn network_requests(&self) -> u64 {
        self.network_requests
    }

    /// Number of fetches answered from the page cache
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    fn cached_body(&self, url: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match cache.get(url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{} cache read failed for {}: {}", self.role, url, e);
                None
            }
        }
    }

    fn store_body(&mut self, url: &str, body: &str) {
        if let Some(cache) = self.cache.as_mut() {
            if let Err(e) = cache.put(url, body) {
                tracing::warn!("{} cache write failed for {}: {}", self.role, url, e);
            }
        }
    }

    async fn attempt(&mut self, url: &str) -> Attempt {
        self.limiter.acquire().await;
        self.network_requests += 1;

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    match response.text().await {
                        Ok(body) => Attempt::Body(body),
                        Err(e) => Attempt::Retry(format!("failed reading body: {}", e)),
                    }
                } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    Attempt::Retry(format!("HTTP {}", status.as_u16()))
                } else {
                    Attempt::Fail(FetchError::Http {
                        url: url.to_string(),
                        status: status.as_u16(),
                    })
                }
            }
            Err(e) if e.is_builder() => Attempt::Fail(FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(e) if e.is_timeout() => Attempt::Retry("request timeout".to_string()),
            Err(e) if e.is_connect() => Attempt::Retry(format!("connection failed: {}", e)),
            Err(e) => Attempt::Retry(e.to_string()),
        }
    }
}

impl Downloader for HttpDownloader {
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        if self.known_bad.contains(url) {
            tracing::debug!("{} URL is known bad, skipping: {}", self.role, url);
            return Err(FetchError::KnownBad {
                url: url.to_string(),
            });
        }

        if let Some(body) = self.cached_body(url) {
            tracing::trace!("{} cache hit: {}", self.role, url);
            self.cache_hits += 1;
            return Ok(body);
        }

        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            match self.attempt(url).await {
                Attempt::Body(body) => {
                    self.store_body(url, &body);
                    return Ok(body);
                }
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(reason) => {
                    tracing::debug!(
                        "{} attempt {}/{} for {} failed: {}",
                        self.role,
                        attempt,
                        self.max_attempts,
                        url,
                        reason
                    );
                    last_error = reason;
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
            last_error,
        })
    }
}
