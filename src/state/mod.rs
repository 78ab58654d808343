//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `UrlFrontier`: the classification ledger of archive pages, articles,
//!   known URLs and newly discovered article URLs
//! - `UrlClass`: the class a URL ends the run in
//! - `PageRole`: whether a fetch was for an archive page or an article

mod frontier;
mod url_class;

// Re-export main types
pub use frontier::UrlFrontier;
pub use url_class::{PageRole, UrlClass};
