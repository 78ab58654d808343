//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the top-level driver that:
//! - Generates the archive base URLs
//! - Walks every archive and processes article URLs page by page
//! - Drains article URLs found only through in-article links
//! - Logs the final classification of every URL and flushes the corpus

use crate::config::{load_url_list, Config, Settings};
use crate::crawler::archive::generate_archive_base_urls;
use crate::crawler::articles::ArticleProcessor;
use crate::crawler::fetcher::{build_http_client, HttpDownloader};
use crate::crawler::pagination::PaginationWalker;
use crate::crawler::parser::RegexExtractor;
use crate::crawler::traits::{Downloader, Extractor};
use crate::crawler::{ARCHIVE_LOG, ARTICLES_LOG};
use crate::output::{ConverterKind, CorpusConverter, CrawlStatistics};
use crate::state::{PageRole, UrlFrontier};
use crate::storage::open_page_cache;
use crate::Result;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

/// Main crawler coordinator structure
///
/// Owns the frontier and every collaborator, and lends the frontier to the
/// walker and the article processor one call at a time.
pub struct Coordinator<D, E> {
    settings: Settings,
    extractor: E,
    archive_downloader: D,
    articles: ArticleProcessor<D>,
    frontier: UrlFrontier,
    archive_base_urls: usize,
    finalized: bool,
}

impl<D: Downloader, E: Extractor> Coordinator<D, E> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `settings` - The run settings
    /// * `extractor` - Link, next-page and date extraction
    /// * `archive_downloader` - Fetches archive pages
    /// * `article_downloader` - Fetches articles
    /// * `converter` - Writes eligible articles to the corpus
    /// * `known_article_urls` - URLs known before the run
    pub fn new(
        settings: Settings,
        extractor: E,
        archive_downloader: D,
        article_downloader: D,
        converter: CorpusConverter,
        known_article_urls: HashSet<String>,
    ) -> Self {
        let articles = ArticleProcessor::new(&settings, article_downloader, converter);
        Self {
            settings,
            extractor,
            archive_downloader,
            articles,
            frontier: UrlFrontier::new(known_article_urls),
            archive_base_urls: 0,
            finalized: false,
        }
    }

    pub fn frontier(&self) -> &UrlFrontier {
        &self.frontier
    }

    pub fn articles(&self) -> &ArticleProcessor<D> {
        &self.articles
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Walks every archive base URL, then drains the new URLs
    ///
    /// Article URLs are processed as each archive page emits them.
    ///
    /// # Errors
    ///
    /// `ConfigError::NoArchiveMode` before any fetch, or a corpus output
    /// failure.
    pub async fn download_and_extract_all(&mut self) -> Result<()> {
        let base_urls = generate_archive_base_urls(&self.settings)?;
        self.archive_base_urls = base_urls.len();
        tracing::info!(
            "Walking {} archive base URLs, {} corpus extraction",
            base_urls.len(),
            self.articles.converter().kind()
        );

        for base_url in base_urls {
            tracing::info!(target: ARCHIVE_LOG, "{};Walking archive", base_url);
            let mut walker = PaginationWalker::new(base_url, self.settings.min_pagenum);

            while let Some(article_urls) = walker
                .step(
                    &mut self.archive_downloader,
                    &self.extractor,
                    &self.settings,
                    &mut self.frontier,
                )
                .await
            {
                self.articles
                    .process(&article_urls, &self.extractor, &mut self.frontier)
                    .await?;
            }
        }

        self.drain_new_urls().await
    }

    /// Processes `newURLs` until no new URL appears
    ///
    /// Performs no fetch when `newURLs` is already empty. If processing
    /// fails, the unprocessed rest of the batch goes back to `newURLs`.
    pub async fn drain_new_urls(&mut self) -> Result<()> {
        while let Some(batch) = self.frontier.take_new_batch() {
            tracing::info!(
                "Drain pass {}: {} new article URLs",
                self.frontier.drain_passes(),
                batch.len()
            );
            for url in &batch {
                tracing::error!(target: ARTICLES_LOG, "{};TRUE NEW URL", url);
            }
            for (i, url) in batch.iter().enumerate() {
                if let Err(e) = self
                    .articles
                    .process_one(url, &self.extractor, &mut self.frontier)
                    .await
                {
                    let restored = self.frontier.restore_new(&batch[i..]);
                    tracing::warn!("Drain interrupted, {} URLs returned to newURLs", restored);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Logs every classification and flushes the corpus
    ///
    /// The classification log is written once, however often this is called.
    pub fn finalize(&mut self) -> Result<CrawlStatistics> {
        if !self.finalized {
            self.finalized = true;
            for (class, url) in self.frontier.final_classifications() {
                match class.role() {
                    Some(PageRole::Archive) => {
                        tracing::info!(target: ARCHIVE_LOG, "{};{}", url, class.label())
                    }
                    _ => tracing::info!(target: ARTICLES_LOG, "{};{}", url, class.label()),
                }
            }
        }

        self.articles.converter_mut().flush()?;
        Ok(self.statistics())
    }

    /// Statistics of the run so far
    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics::collect(
            &self.frontier,
            self.archive_base_urls,
            self.articles.stats(),
            self.articles.converter().records_written(),
        )
    }

    /// Runs the crawl and finalizes on every exit path
    pub async fn run(&mut self) -> Result<CrawlStatistics> {
        let crawl = self.download_and_extract_all().await;
        let finalized = self.finalize();
        crawl?;
        finalized
    }
}

/// Builds the HTTP collaborators from a configuration and runs a crawl
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `converter_kind` - Corpus text extraction strategy
/// * `known_urls_override` - Replaces `settings.known_bad_urls` if given
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed
/// * `Err(CrawlerError)` - Setup failed, no archive mode, or corpus output failed
pub async fn run_crawl(
    config: &Config,
    converter_kind: ConverterKind,
    known_urls_override: Option<&Path>,
) -> Result<CrawlStatistics> {
    let settings = &config.settings;

    let known = match known_urls_override.or(settings.known_bad_urls.as_deref()) {
        Some(path) => load_url_list(path)?,
        None => HashSet::new(),
    };
    tracing::info!("Loaded {} known URLs", known.len());
    let known_bad = Arc::new(known.clone());

    let client = build_http_client(&config.user_agent, &config.downloader)?;

    let mut archive_downloader = HttpDownloader::new(client.clone(), &config.downloader, "archive")
        .with_known_bad(Arc::clone(&known_bad));
    if let Some(path) = &config.downloader.archive_cache {
        archive_downloader = archive_downloader.with_cache(open_page_cache(path)?);
    }

    let mut article_downloader = HttpDownloader::new(client, &config.downloader, "article")
        .with_known_bad(known_bad);
    if let Some(path) = &config.downloader.article_cache {
        article_downloader = article_downloader.with_cache(open_page_cache(path)?);
    }

    let extractor = RegexExtractor::new(&config.extractor)?;

    let output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.output_file)?;
    let converter = CorpusConverter::new(converter_kind, &config.extractor, Box::new(output))?;

    let mut coordinator = Coordinator::new(
        settings.clone(),
        extractor,
        archive_downloader,
        article_downloader,
        converter,
        known,
    );
    let stats = coordinator.run().await?;

    tracing::info!(
        "Crawl finished: {} articles fetched, {} written to {}",
        stats.article_good,
        stats.corpus_records,
        settings.output_file.display()
    );

    Ok(stats)
}
