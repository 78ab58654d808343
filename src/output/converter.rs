//! Corpus conversion
//!
//! Turns downloaded article HTML into JSON-lines corpus records.

use crate::config::ExtractorConfig;
use crate::output::density::DensityExtractor;
use crate::output::rule_based::extract_rule_based;
use crate::output::traits::{CorpusRecord, ExtractedArticle, OutputError, OutputResult};
use scraper::{Html, Selector};
use std::fmt;
use std::io::{BufWriter, Write};
use std::str::FromStr;

/// Text extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConverterKind {
    /// Site-configured title and body selectors
    #[default]
    RuleBased,

    /// Content-density scoring, no site configuration needed
    MlBased,
}

impl ConverterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConverterKind::RuleBased => "rule-based",
            ConverterKind::MlBased => "ml-based",
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConverterKind {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rule-based" | "rule" => Ok(ConverterKind::RuleBased),
            "ml-based" | "ml" | "newspaper" => Ok(ConverterKind::MlBased),
            other => Err(OutputError::Format(format!(
                "unknown converter '{}', expected rule-based or ml-based",
                other
            ))),
        }
    }
}

enum Strategy {
    RuleBased { title: Selector, body: Selector },
    MlBased(DensityExtractor),
}

/// Writes extracted article text to the corpus sink
pub struct CorpusConverter {
    kind: ConverterKind,
    strategy: Strategy,
    sink: BufWriter<Box<dyn Write + Send>>,
    records_written: u64,
}

impl fmt::Debug for CorpusConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpusConverter")
            .field("kind", &self.kind)
            .field("records_written", &self.records_written)
            .finish()
    }
}

impl CorpusConverter {
    /// Creates a converter writing to `sink`
    ///
    /// # Errors
    ///
    /// `OutputError::Format` if a configured selector does not parse.
    pub fn new(
        kind: ConverterKind,
        config: &ExtractorConfig,
        sink: Box<dyn Write + Send>,
    ) -> OutputResult<Self> {
        let strategy = match kind {
            ConverterKind::RuleBased => Strategy::RuleBased {
                title: selector(&config.title_selector)?,
                body: selector(&config.article_body_selector)?,
            },
            ConverterKind::MlBased => Strategy::MlBased(DensityExtractor::new()?),
        };

        Ok(Self {
            kind,
            strategy,
            sink: BufWriter::new(sink),
            records_written: 0,
        })
    }

    pub fn kind(&self) -> ConverterKind {
        self.kind
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Extracts title and text without writing
    pub fn extract(&self, content: &str) -> ExtractedArticle {
        let document = Html::parse_document(content);
        match &self.strategy {
            Strategy::RuleBased { title, body } => extract_rule_based(&document, title, body),
            Strategy::MlBased(density) => density.extract(&document),
        }
    }

    /// Writes one article to the corpus
    ///
    /// Returns `Ok(false)` if the page had no extractable text and nothing
    /// was written.
    pub fn to_corpus(&mut self, url: &str, content: &str) -> OutputResult<bool> {
        let article = self.extract(content);
        if article.is_empty() {
            tracing::warn!("No article text extracted from {}", url);
            return Ok(false);
        }

        let record = CorpusRecord {
            url,
            title: article.title.as_deref(),
            text: article.text(),
            extractor: self.kind.as_str(),
        };
        serde_json::to_writer(&mut self.sink, &record)?;
        self.sink.write_all(b"\n")?;
        self.records_written += 1;
        Ok(true)
    }

    /// Flushes buffered records to the sink
    pub fn flush(&mut self) -> OutputResult<()> {
        self.sink.flush()?;
        Ok(())
    }
}

fn selector(css: &str) -> OutputResult<Selector> {
    Selector::parse(css).map_err(|e| OutputError::Format(format!("{}: {:?}", css, e)))
}
