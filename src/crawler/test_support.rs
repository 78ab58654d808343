//! In-process fakes for crawl tests
//!
//! Fake pages are plain text with one directive per line:
//!
//! ```text
//! link https://x/article
//! next https://x/archive/2
//! date 2020-01-05
//! ```
//!
//! Any other lines (e.g. article HTML) are ignored by `LineExtractor`.

use crate::crawler::traits::{Downloader, Extractor, FetchError};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Downloader serving a fixed set of pages
///
/// URLs without a page fail with HTTP 404. Every fetch is logged, in order.
#[derive(Debug, Default, Clone)]
pub(crate) struct FakeSite {
    pages: HashMap<String, String>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: &str, content: &str) -> Self {
        self.pages.insert(url.to_string(), content.to_string());
        self
    }

    /// URLs fetched so far, in order
    pub(crate) fn fetched(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Downloader for FakeSite {
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        self.log.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Http {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Extractor reading `link`, `next` and `date` directives
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LineExtractor;

fn directives<'a>(content: &'a str, keyword: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    content.lines().filter_map(move |line| {
        line.trim()
            .strip_prefix(keyword)
            .and_then(|rest| rest.strip_prefix(' '))
            .map(str::trim)
    })
}

impl Extractor for LineExtractor {
    fn article_urls(&self, _page_url: &str, content: &str) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for url in directives(content, "link") {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
        urls
    }

    fn next_page_url(&self, _page_url: &str, content: &str) -> Option<String> {
        directives(content, "next").next().map(str::to_string)
    }

    fn article_date(&self, content: &str) -> Option<NaiveDate> {
        directives(content, "date")
            .next()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Archive listing with article links and an optional next link
pub(crate) fn archive_page(articles: &[&str], next: Option<&str>) -> String {
    let mut page = String::new();
    for url in articles {
        page.push_str(&format!("link {}\n", url));
    }
    if let Some(next) = next {
        page.push_str(&format!("next {}\n", next));
    }
    page
}

/// Article with a date, in-article links and an HTML body the rule-based
/// converter can extract
pub(crate) fn article_page(date: Option<&str>, links: &[&str], body: &str) -> String {
    let mut page = String::new();
    if let Some(date) = date {
        page.push_str(&format!("date {}\n", date));
    }
    for url in links {
        page.push_str(&format!("link {}\n", url));
    }
    page.push_str(&format!(
        "<html><body><article><h1>Headline</h1><p>{}</p></article></body></html>\n",
        body
    ));
    page
}

/// Write sink that can be inspected after the writer is moved away
#[derive(Debug, Default, Clone)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Non-empty lines written so far
    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Write sink whose every write fails
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}
