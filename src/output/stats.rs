//! Run statistics
//!
//! This module provides functionality for collecting and displaying crawl
//! statistics from the URL frontier and the article processor.

use crate::crawler::ProcessStats;
use crate::state::{UrlClass, UrlFrontier};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of archive base URLs generated
    pub archive_base_urls: usize,

    pub archive_good: usize,
    pub archive_problematic: usize,
    pub article_good: usize,
    pub article_problematic: usize,

    /// Size of the known-URL list the run started with
    pub known_article_urls: usize,

    /// Article URLs still in `newURLs` after the drain
    pub new_urls: usize,

    /// Number of drain batches
    pub drain_passes: usize,

    /// Article processing counters
    pub articles: ProcessStats,

    /// Records written to the corpus file
    pub corpus_records: u64,

    /// Failed URLs, sorted, for the summary report
    pub problematic_archive_urls: Vec<String>,
    pub problematic_article_urls: Vec<String>,
}

impl CrawlStatistics {
    /// Collects statistics at the end of a run
    pub fn collect(
        frontier: &UrlFrontier,
        archive_base_urls: usize,
        articles: ProcessStats,
        corpus_records: u64,
    ) -> Self {
        let owned = |class| -> Vec<String> {
            frontier
                .urls(class)
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        Self {
            archive_base_urls,
            archive_good: frontier.count(UrlClass::ArchiveGood),
            archive_problematic: frontier.count(UrlClass::ArchiveProblematic),
            article_good: frontier.count(UrlClass::ArticleGood),
            article_problematic: frontier.count(UrlClass::ArticleProblematic),
            known_article_urls: frontier.count(UrlClass::Known),
            new_urls: frontier.count(UrlClass::New),
            drain_passes: frontier.drain_passes(),
            articles,
            corpus_records,
            problematic_archive_urls: owned(UrlClass::ArchiveProblematic),
            problematic_article_urls: owned(UrlClass::ArticleProblematic),
        }
    }

    /// Total article fetch attempts that reached a final class
    pub fn articles_attempted(&self) -> usize {
        self.article_good + self.article_problematic
    }

    /// Share of article fetches that succeeded, as a percentage
    pub fn article_success_rate(&self) -> f64 {
        let attempted = self.articles_attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.article_good as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Archive:");
    println!("  Base URLs generated: {}", stats.archive_base_urls);
    println!("  Pages fetched: {}", stats.archive_good);
    println!("  Pages failed: {}", stats.archive_problematic);
    println!();

    println!("Articles:");
    println!("  Known before run: {}", stats.known_article_urls);
    println!("  Fetched: {}", stats.article_good);
    println!("  Failed: {}", stats.article_problematic);
    println!("  Skipped as duplicates: {}", stats.articles.duplicates);
    println!("  Outside date window: {}", stats.articles.date_misses);
    println!("  Links admitted as new: {}", stats.articles.links_admitted);
    println!("  Drain passes: {}", stats.drain_passes);
    println!();

    println!("Corpus:");
    println!("  Records written: {}", stats.corpus_records);
    println!("  Articles without text: {}", stats.articles.empty_text);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} articles fetched)",
        stats.article_success_rate(),
        stats.article_good,
        stats.articles_attempted()
    );
}
