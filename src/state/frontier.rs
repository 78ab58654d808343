use crate::state::url_class::{PageRole, UrlClass};
use std::collections::HashSet;

/// The URL classification ledger
///
/// Single source of truth for which archive pages and articles were fetched,
/// which failed, which URLs were known before the run, and which article
/// URLs were discovered only through in-article links.
///
/// Classification is monotonic: once a URL lands in a fetch set it never
/// leaves it, and a URL is never both good and problematic for the same role.
#[derive(Debug, Default)]
pub struct UrlFrontier {
    /// Pre-loaded at construction and never written afterwards
    known_article_urls: HashSet<String>,

    archive_good: HashSet<String>,
    archive_problematic: HashSet<String>,
    article_good: HashSet<String>,
    article_problematic: HashSet<String>,

    /// Article URLs found in articles but not (yet) classified elsewhere
    new_urls: HashSet<String>,

    /// Number of batches handed out by `take_new_batch`
    drain_passes: usize,
}

impl UrlFrontier {
    /// Creates a frontier seeded with the known article URLs
    pub fn new(known_article_urls: HashSet<String>) -> Self {
        Self {
            known_article_urls,
            ..Self::default()
        }
    }

    /// The immutable set of URLs known before the run
    pub fn known_article_urls(&self) -> &HashSet<String> {
        &self.known_article_urls
    }

    /// Counts how many of `urls` are known article URLs
    pub fn known_overlap(&self, urls: &[String]) -> usize {
        urls.iter()
            .filter(|url| self.known_article_urls.contains(url.as_str()))
            .count()
    }

    fn set(&self, class: UrlClass) -> &HashSet<String> {
        match class {
            UrlClass::ArchiveGood => &self.archive_good,
            UrlClass::ArchiveProblematic => &self.archive_problematic,
            UrlClass::ArticleGood => &self.article_good,
            UrlClass::ArticleProblematic => &self.article_problematic,
            UrlClass::Known => &self.known_article_urls,
            UrlClass::New => &self.new_urls,
        }
    }

    /// Returns the classification of a URL, if any
    ///
    /// Fetch classes take precedence over `Known`, which takes precedence
    /// over `New`.
    pub fn classify(&self, url: &str) -> Option<UrlClass> {
        UrlClass::all()
            .into_iter()
            .find(|class| self.set(*class).contains(url))
    }

    /// Returns true if the URL is in any of the five sets that bar admission
    /// to `newURLs`
    pub fn is_excluded(&self, url: &str) -> bool {
        matches!(self.classify(url), Some(class) if class.excludes_new())
    }

    /// Returns true if the archive page was already fetched (either outcome)
    pub fn is_archive_visited(&self, url: &str) -> bool {
        self.archive_good.contains(url) || self.archive_problematic.contains(url)
    }

    /// Returns true if the article was already fetched (either outcome)
    pub fn is_article_processed(&self, url: &str) -> bool {
        self.article_good.contains(url) || self.article_problematic.contains(url)
    }

    /// Records the outcome of fetching a page
    ///
    /// Returns false without changing anything if the URL already carries the
    /// opposite outcome for the same role.
    pub fn record_fetch(&mut self, role: PageRole, url: &str, success: bool) -> bool {
        let class = UrlClass::for_fetch(role, success);
        if let Some(opposite) = class.counterpart() {
            if self.set(opposite).contains(url) {
                tracing::warn!(
                    "Refusing to reclassify {} as {}: already {}",
                    url,
                    class,
                    opposite
                );
                return false;
            }
        }

        let set = match class {
            UrlClass::ArchiveGood => &mut self.archive_good,
            UrlClass::ArchiveProblematic => &mut self.archive_problematic,
            UrlClass::ArticleGood => &mut self.article_good,
            UrlClass::ArticleProblematic => &mut self.article_problematic,
            UrlClass::Known | UrlClass::New => return false,
        };
        set.insert(url.to_string());
        true
    }

    /// Adds a discovered article URL to `newURLs`
    ///
    /// The URL is admitted only if it is absent from every exclusion set.
    /// Returns true if it was added.
    pub fn admit_new(&mut self, url: &str) -> bool {
        if self.is_excluded(url) {
            return false;
        }
        self.new_urls.insert(url.to_string())
    }

    /// Takes the next batch of new URLs to process
    ///
    /// Snapshots and clears `newURLs`, then re-filters the snapshot against
    /// the exclusion sets, since processing may have classified some of them
    /// since admission. Returns `None` when `newURLs` is empty, which is the
    /// fixed point of the drain. The batch is sorted for reproducible runs.
    pub fn take_new_batch(&mut self) -> Option<Vec<String>> {
        if self.new_urls.is_empty() {
            return None;
        }

        let snapshot = std::mem::take(&mut self.new_urls);
        self.drain_passes += 1;

        let mut batch: Vec<String> = snapshot
            .into_iter()
            .filter(|url| !self.is_excluded(url))
            .collect();
        batch.sort();
        Some(batch)
    }

    /// Puts URLs of an interrupted batch back into `newURLs`
    ///
    /// URLs classified since the batch was taken stay out. Returns the
    /// number restored.
    pub fn restore_new(&mut self, urls: &[String]) -> usize {
        urls.iter().filter(|url| self.admit_new(url)).count()
    }

    /// Number of URLs currently waiting in `newURLs`
    pub fn pending_new(&self) -> usize {
        self.new_urls.len()
    }

    /// Number of batches taken so far
    pub fn drain_passes(&self) -> usize {
        self.drain_passes
    }

    /// Number of URLs in a class
    pub fn count(&self, class: UrlClass) -> usize {
        self.set(class).len()
    }

    /// URLs in a class, sorted
    pub fn urls(&self, class: UrlClass) -> Vec<&str> {
        let mut urls: Vec<&str> = self.set(class).iter().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    /// Every URL classified during the run with its class
    ///
    /// Ordered by class, then URL. Known URLs are input rather than a run
    /// outcome and are not listed.
    pub fn final_classifications(&self) -> Vec<(UrlClass, &str)> {
        UrlClass::all()
            .into_iter()
            .filter(|class| *class != UrlClass::Known)
            .flat_map(|class| self.urls(class).into_iter().map(move |url| (class, url)))
            .collect()
    }
}
