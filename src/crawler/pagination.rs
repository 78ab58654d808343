//! Archive pagination
//!
//! A `PaginationWalker` drives one archive base URL through its pages, and a
//! `NextPageResolver` decides after each page where (or whether) to go next.

use crate::config::Settings;
use crate::crawler::traits::{Downloader, Extractor};
use crate::crawler::ARCHIVE_LOG;
use crate::state::{PageRole, UrlFrontier};

/// Decides the next page of an archive listing
///
/// Rules, first match wins:
///
/// 1. `next_url_by_regex`: whatever the extractor finds as the "next" link,
///    including nothing.
/// 2. `next_url_by_pagenum`, the page listed at least one article, the known
///    URL set is empty or overlaps this page's articles by more than
///    `same_article_url_threshold`, and `page_num < max_pagenum` (if set):
///    `base_url` followed by `page_num`.
/// 3. Otherwise stop.
///
/// In rule 2, a large overlap with already-known articles keeps the walk
/// going: archives that were reshuffled repeat many known URLs on pages that
/// still lead to unseen ones.
pub struct NextPageResolver<'a, E> {
    settings: &'a Settings,
    extractor: &'a E,
    frontier: &'a UrlFrontier,
}

impl<'a, E: Extractor> NextPageResolver<'a, E> {
    pub fn new(settings: &'a Settings, extractor: &'a E, frontier: &'a UrlFrontier) -> Self {
        Self {
            settings,
            extractor,
            frontier,
        }
    }

    /// Returns the next page URL, or `None` to stop
    ///
    /// # Arguments
    ///
    /// * `page_url` - URL the current page was fetched from
    /// * `content` - Raw content of the current page
    /// * `base_url` - First page of this archive grouping
    /// * `article_urls` - Article URLs extracted from the current page
    /// * `page_num` - Page number of the current step
    pub fn resolve(
        &self,
        page_url: &str,
        content: &str,
        base_url: &str,
        article_urls: &[String],
        page_num: u32,
    ) -> Option<String> {
        if self.settings.next_url_by_regex {
            return self.extractor.next_page_url(page_url, content);
        }

        if self.settings.next_url_by_pagenum
            && !article_urls.is_empty()
            && self.known_urls_allow_continuing(article_urls)
            && self.below_max_pagenum(page_num)
        {
            return Some(format!("{}{}", base_url, page_num));
        }

        None
    }

    fn known_urls_allow_continuing(&self, article_urls: &[String]) -> bool {
        self.frontier.known_article_urls().is_empty()
            || self.frontier.known_overlap(article_urls) > self.settings.same_article_url_threshold
    }

    fn below_max_pagenum(&self, page_num: u32) -> bool {
        self.settings
            .max_pagenum
            .map_or(true, |max_pagenum| page_num < max_pagenum)
    }
}

/// Traversal state of one archive base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    /// The next step fetches `page_url` as page number `page_num`
    Active { page_url: String, page_num: u32 },

    /// Pagination ended or a fetch failed
    Stopped,
}

/// Walks the pages of one archive base URL
///
/// Starts at `Active(base_url, min_pagenum)`. Each `step` fetches one page,
/// records it in the frontier, and returns the article URLs it lists. The
/// walker never fetches a page URL the frontier already classified as an
/// archive page, so cyclic "next" links terminate.
#[derive(Debug)]
pub struct PaginationWalker {
    base_url: String,
    state: WalkState,
    pages_fetched: u32,
}

impl PaginationWalker {
    /// Creates a walker positioned on the base URL
    pub fn new(base_url: impl Into<String>, min_pagenum: u32) -> Self {
        let base_url = base_url.into();
        Self {
            state: WalkState::Active {
                page_url: base_url.clone(),
                page_num: min_pagenum,
            },
            base_url,
            pages_fetched: 0,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn state(&self) -> &WalkState {
        &self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state == WalkState::Stopped
    }

    /// Number of pages successfully fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Advances the walk by one page
    ///
    /// Returns the article URLs of the fetched page (possibly empty), or
    /// `None` once the walk has stopped. A failed fetch records the page as
    /// problematic and stops the walk.
    pub async fn step<D: Downloader, E: Extractor>(
        &mut self,
        downloader: &mut D,
        extractor: &E,
        settings: &Settings,
        frontier: &mut UrlFrontier,
    ) -> Option<Vec<String>> {
        let (page_url, page_num) = match std::mem::replace(&mut self.state, WalkState::Stopped) {
            WalkState::Active { page_url, page_num } => (page_url, page_num),
            WalkState::Stopped => return None,
        };

        if frontier.is_archive_visited(&page_url) {
            tracing::warn!(
                target: ARCHIVE_LOG,
                "{};Archive page already visited, stopping pagination of {}",
                page_url,
                self.base_url
            );
            return None;
        }

        let content = match downloader.fetch(&page_url).await {
            Ok(content) => content,
            Err(e) => {
                frontier.record_fetch(PageRole::Archive, &page_url, false);
                tracing::error!(
                    target: ARCHIVE_LOG,
                    "{};Archive page download failed: {}",
                    page_url,
                    e
                );
                return None;
            }
        };

        self.pages_fetched += 1;
        frontier.record_fetch(PageRole::Archive, &page_url, true);

        let article_urls = extractor.article_urls(&page_url, &content);
        tracing::debug!(
            target: ARCHIVE_LOG,
            "{};Page {} lists {} article URLs",
            page_url,
            page_num,
            article_urls.len()
        );

        let next = NextPageResolver::new(settings, extractor, frontier).resolve(
            &page_url,
            &content,
            &self.base_url,
            &article_urls,
            page_num,
        );

        match next {
            Some(next_url) => {
                self.state = WalkState::Active {
                    page_url: next_url,
                    page_num: page_num.saturating_add(1),
                };
            }
            None => {
                tracing::debug!(
                    target: ARCHIVE_LOG,
                    "{};Pagination ended after {} pages",
                    self.base_url,
                    self.pages_fetched
                );
            }
        }

        Some(article_urls)
    }
}
