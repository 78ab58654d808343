//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a crawl run,
//! including classification counts and the URLs that failed.

use crate::output::stats::CrawlStatistics;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Failed URLs listed per section before the rest is summarized
const MAX_LISTED_URLS: usize = 50;

/// Writes a markdown summary of a run
///
/// # Arguments
///
/// * `stats` - The run statistics
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(stats: &CrawlStatistics, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Corpus Crawl Summary\n\n");

    md.push_str("## Archive\n\n");
    md.push_str(&format!(
        "- **Base URLs Generated**: {}\n",
        stats.archive_base_urls
    ));
    md.push_str(&format!("- **Pages Fetched**: {}\n", stats.archive_good));
    md.push_str(&format!(
        "- **Pages Failed**: {}\n\n",
        stats.archive_problematic
    ));

    md.push_str("## Articles\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Known Before Run | {} |\n", stats.known_article_urls));
    md.push_str(&format!("| Fetched | {} |\n", stats.article_good));
    md.push_str(&format!("| Failed | {} |\n", stats.article_problematic));
    md.push_str(&format!("| Duplicates Skipped | {} |\n", stats.articles.duplicates));
    md.push_str(&format!("| Outside Date Window | {} |\n", stats.articles.date_misses));
    md.push_str(&format!("| Links Admitted | {} |\n", stats.articles.links_admitted));
    md.push_str(&format!("| Still New After Drain | {} |\n\n", stats.new_urls));

    md.push_str(&format!(
        "- **Drain Passes**: {}\n- **Success Rate**: {:.2}%\n\n",
        stats.drain_passes,
        stats.article_success_rate()
    ));

    md.push_str("## Corpus\n\n");
    md.push_str(&format!("- **Records Written**: {}\n", stats.corpus_records));
    md.push_str(&format!(
        "- **Articles Without Text**: {}\n\n",
        stats.articles.empty_text
    ));

    push_url_list(&mut md, "Failed Archive Pages", &stats.problematic_archive_urls);
    push_url_list(&mut md, "Failed Articles", &stats.problematic_article_urls);

    md
}

fn push_url_list(md: &mut String, heading: &str, urls: &[String]) {
    if urls.is_empty() {
        return;
    }

    md.push_str(&format!("## {} ({})\n\n", heading, urls.len()));
    for url in urls.iter().take(MAX_LISTED_URLS) {
        md.push_str(&format!("- {}\n", url));
    }
    if urls.len() > MAX_LISTED_URLS {
        md.push_str(&format!("- ... and {} more\n", urls.len() - MAX_LISTED_URLS));
    }
    md.push('\n');
}
