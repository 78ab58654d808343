//! Output error types and the extracted-article record

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize corpus record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Title and paragraphs pulled out of an article page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: Option<String>,
    pub paragraphs: Vec<String>,
}

impl ExtractedArticle {
    /// Returns true if there is no body text
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Paragraphs joined by blank lines
    pub fn text(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

/// One line of the corpus file
#[derive(Debug, Clone, Serialize)]
pub struct CorpusRecord<'a> {
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub text: String,
    pub extractor: &'static str,
}
