use crate::config::types::{Config, DownloaderConfig, ExtractorConfig, Settings, UserAgentConfig};
use crate::crawler::format_archive_url;
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_settings(&config.settings)?;
    validate_extractor_config(&config.extractor, &config.settings)?;
    validate_downloader_config(&config.downloader)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the site settings
fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.date_from > settings.date_until {
        return Err(ConfigError::Validation(format!(
            "date_from ({}) must not be after date_until ({})",
            settings.date_from, settings.date_until
        )));
    }

    if settings.archive_url_format.is_empty() {
        return Err(ConfigError::Validation(
            "archive_url_format cannot be empty".to_string(),
        ));
    }

    // The template must be a valid URL once its placeholders are filled in
    let sample = format_archive_url(&settings.archive_url_format, settings.date_from);
    Url::parse(&sample).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid archive_url_format '{}': {}", sample, e))
    })?;

    if let Some(max_pagenum) = settings.max_pagenum {
        if settings.min_pagenum > max_pagenum {
            return Err(ConfigError::Validation(format!(
                "min_pagenum ({}) must not exceed max_pagenum ({})",
                settings.min_pagenum, max_pagenum
            )));
        }
    }

    for (name, path) in [
        ("output_file", &settings.output_file),
        ("log_file_archive", &settings.log_file_archive),
        ("log_file_articles", &settings.log_file_articles),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates extractor patterns and selectors
fn validate_extractor_config(
    config: &ExtractorConfig,
    settings: &Settings,
) -> Result<(), ConfigError> {
    validate_regex("article_url_pattern", &config.article_url_pattern)?;

    match &config.next_page_pattern {
        Some(pattern) => validate_regex("next_page_pattern", pattern)?,
        None if settings.next_url_by_regex => {
            return Err(ConfigError::Validation(
                "next_url_by_regex requires extractor.next_page_pattern".to_string(),
            ));
        }
        None => {}
    }

    if let Some(pattern) = &config.article_date_pattern {
        validate_regex("article_date_pattern", pattern)?;
    }

    if config.article_date_format.is_empty() {
        return Err(ConfigError::Validation(
            "article_date_format cannot be empty".to_string(),
        ));
    }

    validate_selector("article_link_selector", &config.article_link_selector)?;
    validate_selector("title_selector", &config.title_selector)?;
    validate_selector("article_body_selector", &config.article_body_selector)?;

    Ok(())
}

/// Validates downloader limits
fn validate_downloader_config(config: &DownloaderConfig) -> Result<(), ConfigError> {
    if config.error_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "error_threshold must be >= 1, got {}",
            config.error_threshold
        )));
    }

    if config.max_calls_in_period < 1 {
        return Err(ConfigError::Validation(format!(
            "max_calls_in_period must be >= 1, got {}",
            config.max_calls_in_period
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if let Some(proxy) = &config.proxy_url {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy_url: {}", e)))?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

fn validate_regex(name: &str, pattern: &str) -> Result<(), ConfigError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", name, e)))
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern(format!("{} '{}': {:?}", name, selector, e)))
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
