//! Content-density article extraction
//!
//! Finds the main text container of a page without site-specific selectors.
//! Every paragraph of at least `MIN_PARAGRAPH_CHARS` characters scores its
//! parent fully and its grandparent half. Each candidate's score is then
//! weighted by its tag, its class/id hints, and `1 - link_density`. The
//! paragraphs of the best container form the article text.

use crate::output::rule_based::normalized_text;
use crate::output::traits::{ExtractedArticle, OutputError, OutputResult};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

const CANDIDATE_TAGS: [&str; 5] = ["article", "main", "section", "div", "td"];

const MIN_PARAGRAPH_CHARS: usize = 25;

const POSITIVE_HINTS: [&str; 7] = ["article", "body", "content", "entry", "main", "story", "text"];

const NEGATIVE_HINTS: [&str; 10] = [
    "comment", "footer", "sidebar", "related", "share", "promo", "nav", "menu", "advert", "social",
];

/// Base score of a candidate container by tag name
pub fn base_tag_score(tag: &str) -> f64 {
    match tag {
        "article" => 10.0,
        "main" => 8.0,
        "div" => 5.0,
        "section" | "td" => 3.0,
        _ => 0.0,
    }
}

/// Class/id weight: +25 for content-like hints, -25 for boilerplate hints
pub fn class_id_weight(element: ElementRef<'_>) -> f64 {
    let value = element.value();
    let hints = format!(
        "{} {}",
        value.attr("class").unwrap_or_default(),
        value.id().unwrap_or_default()
    )
    .to_lowercase();

    let mut weight = 0.0;
    if NEGATIVE_HINTS.iter().any(|h| hints.contains(h)) {
        weight -= 25.0;
    }
    if POSITIVE_HINTS.iter().any(|h| hints.contains(h)) {
        weight += 25.0;
    }
    weight
}

/// Score a paragraph contributes: 1, plus commas, plus one per 100 chars (max 3)
pub fn paragraph_score(text: &str) -> f64 {
    let commas = text.matches(',').count() as f64;
    let length_bonus = (text.chars().count() / 100).min(3) as f64;
    1.0 + commas + length_bonus
}

/// Ranks page containers by text density
#[derive(Debug)]
pub struct DensityExtractor {
    paragraph: Selector,
    link: Selector,
    heading: Selector,
    title: Selector,
}

impl DensityExtractor {
    pub fn new() -> OutputResult<Self> {
        Ok(Self {
            paragraph: selector("p")?,
            link: selector("a")?,
            heading: selector("h1")?,
            title: selector("title")?,
        })
    }

    /// Share of an element's text that sits inside links
    pub fn link_density(&self, element: ElementRef<'_>) -> f64 {
        let total: usize = element.text().map(|t| t.trim().len()).sum();
        if total == 0 {
            return 0.0;
        }
        let linked: usize = element
            .select(&self.link)
            .flat_map(|a| a.text())
            .map(|t| t.trim().len())
            .sum();
        linked as f64 / total as f64
    }

    pub fn extract(&self, document: &Html) -> ExtractedArticle {
        let title = [&self.heading, &self.title].into_iter().find_map(|selector| {
            document
                .select(selector)
                .map(normalized_text)
                .find(|t| !t.is_empty())
        });

        let paragraphs = self
            .best_container(document)
            .map(|container| {
                container
                    .select(&self.paragraph)
                    .map(normalized_text)
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        ExtractedArticle { title, paragraphs }
    }

    fn best_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let mut scores = HashMap::new();

        for paragraph in document.select(&self.paragraph) {
            let text = normalized_text(paragraph);
            if text.chars().count() < MIN_PARAGRAPH_CHARS {
                continue;
            }
            let score = paragraph_score(&text);

            let parent = paragraph.parent().and_then(ElementRef::wrap);
            let grandparent = parent
                .and_then(|p| p.parent())
                .and_then(ElementRef::wrap);

            for (ancestor, share) in [(parent, 1.0), (grandparent, 0.5)] {
                let Some(ancestor) = ancestor else { continue };
                let tag = ancestor.value().name();
                if !CANDIDATE_TAGS.contains(&tag) {
                    continue;
                }
                let entry = scores
                    .entry(ancestor.id())
                    .or_insert_with(|| (ancestor, base_tag_score(tag) + class_id_weight(ancestor)));
                entry.1 += score * share;
            }
        }

        scores
            .into_values()
            .map(|(element, score)| (element, score * (1.0 - self.link_density(element))))
            .filter(|(_, score)| *score > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(element, _)| element)
    }
}

fn selector(css: &str) -> OutputResult<Selector> {
    Selector::parse(css).map_err(|e| OutputError::Format(format!("{}: {:?}", css, e)))
}
