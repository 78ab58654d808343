//! Article processing
//!
//! Downloads article pages, filters them by publication date, hands the
//! eligible ones to the corpus converter and feeds their outbound article
//! links back into the frontier.

use crate::config::Settings;
use crate::crawler::traits::{Downloader, Extractor};
use crate::crawler::ARTICLES_LOG;
use crate::output::CorpusConverter;
use crate::state::{PageRole, UrlFrontier};
use crate::Result;
use chrono::NaiveDate;

/// What happened to one article URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// Already fetched earlier in the run; skipped without a request
    Duplicate,

    /// Download failed; recorded as problematic
    FetchFailed,

    /// Fetched, but the publication date is missing or outside the window
    DateFilterMiss { date: Option<NaiveDate> },

    /// Fetched, in the window, and written to the corpus
    Converted,

    /// Fetched and in the window, but nothing was written (corpus creation
    /// disabled, or no extractable text)
    Collected,
}

/// Counters over every processed article URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub fetched: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub date_misses: usize,
    pub converted: usize,
    pub collected: usize,

    /// In-window articles the converter found no text in
    pub empty_text: usize,

    /// Outbound links that entered `newURLs`
    pub links_admitted: usize,
}

/// Consumes article URLs for the Coordinator
pub struct ArticleProcessor<D> {
    downloader: D,
    converter: CorpusConverter,
    date_from: NaiveDate,
    date_until: NaiveDate,
    create_corpus: bool,
    stats: ProcessStats,
}

impl<D: Downloader> ArticleProcessor<D> {
    pub fn new(settings: &Settings, downloader: D, converter: CorpusConverter) -> Self {
        Self {
            downloader,
            converter,
            date_from: settings.date_from,
            date_until: settings.date_until,
            create_corpus: settings.create_corpus,
            stats: ProcessStats::default(),
        }
    }

    pub fn stats(&self) -> ProcessStats {
        self.stats
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    pub fn converter(&self) -> &CorpusConverter {
        &self.converter
    }

    pub fn converter_mut(&mut self) -> &mut CorpusConverter {
        &mut self.converter
    }

    /// Both bounds are inclusive
    pub fn date_in_window(&self, date: NaiveDate) -> bool {
        self.date_from <= date && date <= self.date_until
    }

    /// Processes a batch of article URLs in order
    ///
    /// # Errors
    ///
    /// Only corpus output failures; fetch failures and date misses are
    /// recorded and processing continues.
    pub async fn process<E: Extractor>(
        &mut self,
        urls: &[String],
        extractor: &E,
        frontier: &mut UrlFrontier,
    ) -> Result<()> {
        for url in urls {
            self.process_one(url, extractor, frontier).await?;
        }
        Ok(())
    }

    /// Processes one article URL
    pub async fn process_one<E: Extractor>(
        &mut self,
        url: &str,
        extractor: &E,
        frontier: &mut UrlFrontier,
    ) -> Result<ArticleOutcome> {
        if frontier.is_article_processed(url) {
            tracing::warn!(target: ARTICLES_LOG, "{};Duplicate article URL, skipping", url);
            self.stats.duplicates += 1;
            return Ok(ArticleOutcome::Duplicate);
        }

        let content = match self.downloader.fetch(url).await {
            Ok(content) => content,
            Err(e) => {
                frontier.record_fetch(PageRole::Article, url, false);
                tracing::error!(target: ARTICLES_LOG, "{};Article download failed: {}", url, e);
                self.stats.failed += 1;
                return Ok(ArticleOutcome::FetchFailed);
            }
        };

        frontier.record_fetch(PageRole::Article, url, true);
        self.stats.fetched += 1;

        let date = extractor.article_date(&content);
        let outcome = match date {
            Some(d) if self.date_in_window(d) => self.collect(url, &content)?,
            _ => {
                tracing::warn!(
                    target: ARTICLES_LOG,
                    "{};Date {} outside [{}, {}], not used in the corpus",
                    url,
                    date.map_or_else(|| "missing".to_string(), |d| d.to_string()),
                    self.date_from,
                    self.date_until
                );
                self.stats.date_misses += 1;
                ArticleOutcome::DateFilterMiss { date }
            }
        };

        for link in extractor.article_urls(url, &content) {
            if frontier.admit_new(&link) {
                tracing::debug!(target: ARTICLES_LOG, "{};Found new article link {}", url, link);
                self.stats.links_admitted += 1;
            }
        }

        Ok(outcome)
    }

    fn collect(&mut self, url: &str, content: &str) -> Result<ArticleOutcome> {
        if !self.create_corpus {
            self.stats.collected += 1;
            return Ok(ArticleOutcome::Collected);
        }

        if self.converter.to_corpus(url, content)? {
            self.stats.converted += 1;
            Ok(ArticleOutcome::Converted)
        } else {
            self.stats.empty_text += 1;
            self.stats.collected += 1;
            Ok(ArticleOutcome::Collected)
        }
    }
}
