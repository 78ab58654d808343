//! corpus-crawler main entry point
//!
//! This is the command-line interface for the archive-driven news crawler.

use anyhow::Context;
use clap::Parser;
use corpus_crawler::config::{load_config_with_hash, Config, Settings};
use corpus_crawler::crawler::{generate_archive_base_urls, run_crawl, ARCHIVE_LOG, ARTICLES_LOG};
use corpus_crawler::output::{generate_markdown_summary, print_statistics, ConverterKind};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// corpus-crawler: builds a text corpus from a news site's archive
///
/// Walks the dated or paginated archive of a news site, downloads every
/// article in the configured date window, follows in-article links to
/// articles the archive does not list, and appends the extracted text to a
/// JSON-lines corpus file.
#[derive(Parser, Debug)]
#[command(name = "corpus-crawler")]
#[command(version)]
#[command(about = "Archive-driven news corpus crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Article text extraction strategy (rule-based, ml-based)
    #[arg(long, default_value = "rule-based")]
    converter: ConverterKind,

    /// Newline-delimited list of known URLs, overriding settings.known_bad_urls
    #[arg(long, value_name = "FILE")]
    known_bad_urls: Option<PathBuf>,

    /// Validate config and print the archive base URLs without crawling
    #[arg(long)]
    dry_run: bool,

    /// Write a markdown summary of the run to FILE
    #[arg(long, value_name = "FILE", conflicts_with = "dry_run")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    if cli.dry_run {
        return handle_dry_run(&config, &config_hash);
    }

    setup_logging(cli.verbose, cli.quiet, &config.settings)?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    handle_crawl(&config, &cli).await
}

/// Sets up stderr logging plus the archive and articles log files
///
/// Archive and article events go to their log files in append mode. Stderr
/// shows crate events by verbosity and only warnings from the two log
/// targets.
fn setup_logging(verbose: u8, quiet: bool, settings: &Settings) -> anyhow::Result<()> {
    let stderr_filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("corpus_crawler=info,archive=warn,articles=warn,warn"),
            1 => EnvFilter::new("corpus_crawler=debug,archive=info,articles=info,info"),
            2 => EnvFilter::new("corpus_crawler=trace,archive=debug,articles=debug,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_level = if verbose > 0 { Level::DEBUG } else { Level::INFO };

    let archive_log = open_log_file(&settings.log_file_archive)?;
    let articles_log = open_log_file(&settings.log_file_articles)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(stderr_filter),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(archive_log))
                .with_ansi(false)
                .with_target(false)
                .with_filter(Targets::new().with_target(ARCHIVE_LOG, file_level)),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(articles_log))
                .with_ansi(false)
                .with_target(false)
                .with_filter(Targets::new().with_target(ARTICLES_LOG, file_level)),
        )
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let settings = &config.settings;
    println!("=== corpus-crawler Dry Run ===\n");

    println!("Settings:");
    println!("  Date window: {} .. {}", settings.date_from, settings.date_until);
    println!("  Archive URL format: {}", settings.archive_url_format);
    println!(
        "  Pagination: regex={}, pagenum={} (min {}, max {})",
        settings.next_url_by_regex,
        settings.next_url_by_pagenum,
        settings.min_pagenum,
        settings
            .max_pagenum
            .map_or_else(|| "unbounded".to_string(), |m| m.to_string())
    );
    println!("  Create corpus: {}", settings.create_corpus);
    println!("  Output: {}", settings.output_file.display());
    println!("  Config hash: {}", config_hash);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    let base_urls = generate_archive_base_urls(settings)?;
    println!("\nArchive Base URLs ({}):", base_urls.len());
    for url in &base_urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} .. {} with the {} converter",
        config.settings.date_from,
        config.settings.date_until,
        cli.converter
    );

    let stats = match run_crawl(config, cli.converter, cli.known_bad_urls.as_deref()).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_statistics(&stats);
    }

    if let Some(path) = &cli.summary {
        generate_markdown_summary(&stats, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}
