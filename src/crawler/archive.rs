//! Archive base URL generation
//!
//! An archive is either grouped by date (one listing per day, month or year)
//! or rooted at a single id-keyed listing that is then paginated.

use crate::config::Settings;
use crate::crawler::ARCHIVE_LOG;
use crate::ConfigError;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Fills the `#year`, `#month` and `#day` placeholders of an archive template
///
/// Templates need not use every placeholder, so coarser archives (by month
/// or year) collapse several days onto one URL.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use corpus_crawler::crawler::format_archive_url;
///
/// let day = NaiveDate::from_ymd_opt(2020, 3, 7).unwrap();
/// assert_eq!(
///     format_archive_url("https://x/#year/#month/#day", day),
///     "https://x/2020/03/07"
/// );
/// ```
pub fn format_archive_url(url_format: &str, date: NaiveDate) -> String {
    url_format
        .replace("#year", &format!("{:04}", date.year()))
        .replace("#month", &format!("{:02}", date.month()))
        .replace("#day", &format!("{:02}", date.day()))
}

/// Generates the ordered archive base URLs for a run
///
/// Date mode substitutes every day of `[date_from, date_until]` into the
/// template, deduplicates and sorts (descending with
/// `go_reverse_in_archive`). Id mode is used only when date mode produced
/// nothing and yields the template verbatim.
///
/// # Errors
///
/// `ConfigError::NoArchiveMode` if neither mode produced a URL.
pub fn generate_archive_base_urls(settings: &Settings) -> Result<Vec<String>, ConfigError> {
    let mut base_urls: Vec<String> = Vec::new();

    if settings.archive_page_urls_by_date {
        let unique: BTreeSet<String> = settings
            .date_from
            .iter_days()
            .take_while(|day| *day <= settings.date_until)
            .map(|day| format_archive_url(&settings.archive_url_format, day))
            .collect();

        base_urls = unique.into_iter().collect();
        if settings.go_reverse_in_archive {
            base_urls.reverse();
        }
    }

    if settings.archive_page_urls_by_id && base_urls.is_empty() {
        base_urls.push(settings.archive_url_format.clone());
    }

    if base_urls.is_empty() {
        return Err(ConfigError::NoArchiveMode);
    }

    tracing::debug!(
        target: ARCHIVE_LOG,
        "Generated {} archive base URLs",
        base_urls.len()
    );

    Ok(base_urls)
}
