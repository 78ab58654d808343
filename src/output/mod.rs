//! Output module for the corpus file and run reports
//!
//! This module handles:
//! - Converting article HTML into JSON-lines corpus records
//! - Recording crawl statistics
//! - Generating markdown summaries of a run

mod converter;
mod density;
mod markdown;
mod rule_based;
pub mod stats;
mod traits;

pub use converter::{ConverterKind, CorpusConverter};
pub use density::DensityExtractor;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use rule_based::extract_rule_based;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{CorpusRecord, ExtractedArticle, OutputError, OutputResult};
