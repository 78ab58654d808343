//! Selector-driven article text extraction

use crate::output::traits::ExtractedArticle;
use scraper::{ElementRef, Html, Selector};

/// Collapses runs of whitespace and trims
pub(crate) fn normalized_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the title and body paragraphs with site-configured selectors
pub fn extract_rule_based(
    document: &Html,
    title_selector: &Selector,
    body_selector: &Selector,
) -> ExtractedArticle {
    let title = document
        .select(title_selector)
        .map(normalized_text)
        .find(|t| !t.is_empty());

    let paragraphs = document
        .select(body_selector)
        .map(normalized_text)
        .filter(|p| !p.is_empty())
        .collect();

    ExtractedArticle { title, paragraphs }
}
