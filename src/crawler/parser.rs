//! HTML extractor for archive and article pages
//!
//! This module handles parsing page content to extract:
//! - Article links (selector + URL pattern)
//! - The explicit "next page" link of an archive page
//! - The publication date of an article

use crate::config::ExtractorConfig;
use crate::crawler::traits::Extractor;
use crate::ConfigError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Meta tags consulted for the publication date when no date pattern is set
const DATE_META_SELECTORS: [(&str, &str); 4] = [
    (r#"meta[property="article:published_time"]"#, "content"),
    (r#"meta[itemprop="datePublished"]"#, "content"),
    (r#"meta[name="date"]"#, "content"),
    ("time[datetime]", "datetime"),
];

/// Site-configured extractor
///
/// # Link Extraction Rules
///
/// **Include:**
/// - Elements matched by `article_link_selector` whose resolved `href`
///   matches `article_url_pattern`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs and fragment-only links
///
/// Fragments are stripped, so `/a#comments` and `/a` are the same article.
#[derive(Debug)]
pub struct RegexExtractor {
    link_selector: Selector,
    article_url_pattern: Regex,
    next_page_pattern: Option<Regex>,
    date_pattern: Option<Regex>,
    date_format: String,
    date_meta: Vec<(Selector, &'static str)>,
}

impl RegexExtractor {
    /// Compiles the extractor configuration
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidPattern` for a regex or selector that does not
    /// compile.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        let link_selector = parse_selector(&config.article_link_selector)?;
        let article_url_pattern = compile(&config.article_url_pattern)?;
        let next_page_pattern = config.next_page_pattern.as_deref().map(compile).transpose()?;
        let date_pattern = config.article_date_pattern.as_deref().map(compile).transpose()?;

        let date_meta = DATE_META_SELECTORS
            .iter()
            .map(|(selector, attr)| parse_selector(selector).map(|s| (s, *attr)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            link_selector,
            article_url_pattern,
            next_page_pattern,
            date_pattern,
            date_format: config.article_date_format.clone(),
            date_meta,
        })
    }

    fn date_from_pattern(&self, pattern: &Regex, content: &str) -> Option<NaiveDate> {
        let captures = pattern.captures(content)?;
        let raw = captures
            .name("date")
            .or_else(|| captures.get(1))
            .or_else(|| captures.get(0))?
            .as_str()
            .trim();
        parse_with_format(raw, &self.date_format)
    }

    fn date_from_meta(&self, content: &str) -> Option<NaiveDate> {
        let document = Html::parse_document(content);
        self.date_meta.iter().find_map(|(selector, attr)| {
            document
                .select(selector)
                .filter_map(|element| element.value().attr(attr))
                .find_map(parse_iso_date)
        })
    }
}

impl Extractor for RegexExtractor {
    fn article_urls(&self, page_url: &str, content: &str) -> Vec<String> {
        let Ok(base_url) = Url::parse(page_url) else {
            tracing::warn!("Cannot resolve links against invalid page URL {}", page_url);
            return Vec::new();
        };

        let document = Html::parse_document(content);
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for element in document.select(&self.link_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(absolute_url) = resolve_link(href, &base_url) else {
                continue;
            };
            if self.article_url_pattern.is_match(&absolute_url) && seen.insert(absolute_url.clone())
            {
                urls.push(absolute_url);
            }
        }

        urls
    }

    fn next_page_url(&self, page_url: &str, content: &str) -> Option<String> {
        let pattern = self.next_page_pattern.as_ref()?;
        let captures = pattern.captures(content)?;
        let raw = captures
            .name("url")
            .or_else(|| captures.get(1))
            .or_else(|| captures.get(0))?
            .as_str()
            .replace("&amp;", "&");

        let base_url = Url::parse(page_url).ok()?;
        resolve_link(&raw, &base_url)
    }

    fn article_date(&self, content: &str) -> Option<NaiveDate> {
        match &self.date_pattern {
            Some(pattern) => self.date_from_pattern(pattern, content),
            None => self.date_from_meta(content),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", pattern, e)))
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidPattern(format!("{}: {:?}", selector, e)))
}

/// Parses a date or datetime with a strftime-style format
fn parse_with_format(raw: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, format)
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parses an RFC 3339 timestamp or a value starting with `YYYY-MM-DD`
fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);
    Some(absolute_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://news.example.com/archive/2020/01";

    fn config() -> ExtractorConfig {
        ExtractorConfig {
            article_url_pattern: r"^https://news\.example\.com/\d{4}/".to_string(),
            article_link_selector: "a[href]".to_string(),
            next_page_pattern: Some(r#"<a class="next" href="(?P<url>[^"]+)""#.to_string()),
            article_date_pattern: None,
            article_date_format: "%Y-%m-%d".to_string(),
            title_selector: "h1".to_string(),
            article_body_selector: "article p".to_string(),
        }
    }

    fn extractor() -> RegexExtractor {
        RegexExtractor::new(&config()).unwrap()
    }

    #[test]
    fn test_extract_relative_article_link() {
        let html = r#"<html><body><a href="/2020/01/story">Story</a></body></html>"#;
        assert_eq!(
            extractor().article_urls(PAGE_URL, html),
            vec!["https://news.example.com/2020/01/story"]
        );
    }

    #[test]
    fn test_non_article_links_are_dropped() {
        let html = r#"
            <html><body>
                <a href="/about">About</a>
                <a href="https://other.com/2020/01/story">Elsewhere</a>
                <a href="/2020/01/story">Story</a>
            </body></html>
        "#;
        assert_eq!(
            extractor().article_urls(PAGE_URL, html),
            vec!["https://news.example.com/2020/01/story"]
        );
    }

    #[test]
    fn test_links_deduplicated_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/2020/01/b">B</a>
                <a href="/2020/01/a">A</a>
                <a href="/2020/01/b#comments">B again</a>
            </body></html>
        "#;
        assert_eq!(
            extractor().article_urls(PAGE_URL, html),
            vec![
                "https://news.example.com/2020/01/b",
                "https://news.example.com/2020/01/a"
            ]
        );
    }

    #[test]
    fn test_skip_special_schemes_and_downloads() {
        let html = r##"
            <html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:desk@news.example.com">Mail</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,<h1>x</h1>">Data</a>
                <a href="#top">Top</a>
                <a href="/2020/01/file.pdf" download>PDF</a>
            </body></html>
        "##;
        assert!(extractor().article_urls(PAGE_URL, html).is_empty());
    }

    #[test]
    fn test_custom_link_selector() {
        let mut config = config();
        config.article_link_selector = "h2.headline a".to_string();
        let extractor = RegexExtractor::new(&config).unwrap();

        let html = r#"
            <html><body>
                <h2 class="headline"><a href="/2020/01/lead">Lead</a></h2>
                <aside><a href="/2020/01/related">Related</a></aside>
            </body></html>
        "#;
        assert_eq!(
            extractor.article_urls(PAGE_URL, html),
            vec!["https://news.example.com/2020/01/lead"]
        );
    }

    #[test]
    fn test_invalid_page_url_yields_nothing() {
        let html = r#"<a href="/2020/01/story">Story</a>"#;
        assert!(extractor().article_urls("not a url", html).is_empty());
    }

    #[test]
    fn test_next_page_named_group_unescaped() {
        let html = r#"<a class="next" href="/archive/2020/01?page=2&amp;sort=new">Next</a>"#;
        assert_eq!(
            extractor().next_page_url(PAGE_URL, html),
            Some("https://news.example.com/archive/2020/01?page=2&sort=new".to_string())
        );
    }

    #[test]
    fn test_next_page_first_group() {
        let mut config = config();
        config.next_page_pattern = Some(r#"rel="next" href="([^"]+)""#.to_string());
        let extractor = RegexExtractor::new(&config).unwrap();

        let html = r#"<link rel="next" href="https://news.example.com/archive/2020/01/2">"#;
        assert_eq!(
            extractor.next_page_url(PAGE_URL, html),
            Some("https://news.example.com/archive/2020/01/2".to_string())
        );
    }

    #[test]
    fn test_no_next_page() {
        let html = r#"<html><body><a href="/2020/01/story">Story</a></body></html>"#;
        assert_eq!(extractor().next_page_url(PAGE_URL, html), None);

        let mut config = config();
        config.next_page_pattern = None;
        let extractor = RegexExtractor::new(&config).unwrap();
        let html = r#"<a class="next" href="/archive/2">Next</a>"#;
        assert_eq!(extractor.next_page_url(PAGE_URL, html), None);
    }

    #[test]
    fn test_date_from_pattern() {
        let mut config = config();
        config.article_date_pattern = Some(r#"<span class="date">(?P<date>[^<]+)</span>"#.to_string());
        config.article_date_format = "%d.%m.%Y".to_string();
        let extractor = RegexExtractor::new(&config).unwrap();

        let html = r#"<span class="date">05.01.2020</span>"#;
        assert_eq!(
            extractor.article_date(html),
            NaiveDate::from_ymd_opt(2020, 1, 5)
        );
    }

    #[test]
    fn test_date_from_pattern_with_datetime_format() {
        let mut config = config();
        config.article_date_pattern = Some(r#"data-published="([^"]+)""#.to_string());
        config.article_date_format = "%Y-%m-%d %H:%M".to_string();
        let extractor = RegexExtractor::new(&config).unwrap();

        let html = r#"<div data-published="2020-01-05 13:45"></div>"#;
        assert_eq!(
            extractor.article_date(html),
            NaiveDate::from_ymd_opt(2020, 1, 5)
        );
    }

    #[test]
    fn test_unparsable_date_is_none() {
        let mut config = config();
        config.article_date_pattern = Some(r#"<span class="date">([^<]+)</span>"#.to_string());
        let extractor = RegexExtractor::new(&config).unwrap();

        assert_eq!(extractor.article_date(r#"<span class="date">yesterday</span>"#), None);
        assert_eq!(extractor.article_date("<p>no date</p>"), None);
    }

    #[test]
    fn test_date_from_meta_tags() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="2020-01-05T08:30:00+01:00">
            </head><body></body></html>"#;
        assert_eq!(
            extractor().article_date(html),
            NaiveDate::from_ymd_opt(2020, 1, 5)
        );
    }

    #[test]
    fn test_date_from_time_element() {
        let html = r#"<html><body><time datetime="2020-01-07">7 January</time></body></html>"#;
        assert_eq!(
            extractor().article_date(html),
            NaiveDate::from_ymd_opt(2020, 1, 7)
        );
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut config = config();
        config.article_url_pattern = "(unclosed".to_string();
        assert!(matches!(
            RegexExtractor::new(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut config = config();
        config.article_link_selector = "a[".to_string();
        assert!(matches!(
            RegexExtractor::new(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }
}
