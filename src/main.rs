use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daetgul::config::Config;
use daetgul::crawler::{CommentClient, Deduplicator, NaverFetcher, SearchCrawler};
use daetgul::models::CommentRunStats;
use daetgul::storage;
use daetgul::utils::error::CrawlerError;

#[derive(Parser)]
#[command(
    name = "daetgul",
    version,
    about = "Naver news keyword crawler with comment collection",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Configuration file path (TOML); environment variables otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect article links for a keyword over a date range
    Links {
        /// Search keyword
        keyword: String,

        /// Start date (YYYY.MM.DD)
        #[arg(short, long)]
        start: String,

        /// End date (YYYY.MM.DD), inclusive
        #[arg(short, long)]
        end: String,

        /// Output CSV file name (written under the output directory)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Collect comments for previously collected articles
    Comments {
        /// Input CSV with a `url` or `link` column
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file name (appended to if it exists)
        #[arg(short, long)]
        output: PathBuf,

        /// Minimum total comment count; articles below it are skipped
        #[arg(short, long)]
        min_count: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate().context("Invalid configuration")?;

    setup_tracing(&cli.log_format, cli.verbose)?;

    tracing::info!("daetgul crawler starting");

    match cli.command {
        Commands::Links {
            keyword,
            start,
            end,
            output,
        } => {
            tracing::info!(
                keyword = %keyword,
                start = %start,
                end = %end,
                "Starting links command"
            );
            collect_links(&config, &keyword, &start, &end, &output).await?;
        }

        Commands::Comments {
            input,
            output,
            min_count,
        } => {
            let min_count = min_count.unwrap_or(config.crawler.min_comment_count);
            tracing::info!(
                input = %input.display(),
                min_count = %min_count,
                "Starting comments command"
            );
            collect_comments(&config, &input, &output, min_count).await?;
        }
    }

    tracing::info!("daetgul completed");
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("daetgul=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("daetgul=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate, CrawlerError> {
    NaiveDate::parse_from_str(value, "%Y.%m.%d")
        .map_err(|_| CrawlerError::InvalidDate(value.to_string()))
}

/// Resolve an output file name under the configured output directory,
/// creating the directory when missing. Absolute paths are used as-is.
fn resolve_output(config: &Config, name: &Path) -> Result<PathBuf> {
    let path = if name.is_absolute() {
        name.to_path_buf()
    } else {
        config.output.dir.join(name)
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }

    Ok(path)
}

async fn collect_links(
    config: &Config,
    keyword: &str,
    start: &str,
    end: &str,
    output: &Path,
) -> Result<()> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
        anyhow::bail!("Start date {start} is after end date {end}");
    }

    let fetcher = NaverFetcher::with_config(
        config.search_timeout(),
        config.request_delay(),
        config.crawler.max_retries,
        config.crawler.user_agent.clone(),
    )?;
    let crawler = SearchCrawler::new(fetcher);
    let mut dedup = Deduplicator::new();

    let (candidates, stats) = crawler.collect_range(keyword, start, end, &mut dedup).await;

    let path = resolve_output(config, output)?;
    storage::write_candidates(&path, &candidates)?;

    tracing::info!(
        articles = candidates.len(),
        days_failed = stats.days_failed,
        duplicates_skipped = stats.duplicates_skipped,
        output = %path.display(),
        "Link collection finished"
    );
    println!(
        "Collected {} articles over {} days ({} failed) -> {}",
        candidates.len(),
        stats.days_crawled + stats.days_failed,
        stats.days_failed,
        path.display()
    );

    Ok(())
}

async fn collect_comments(
    config: &Config,
    input: &Path,
    output: &Path,
    min_count: i64,
) -> Result<()> {
    let links = storage::read_article_links(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    tracing::info!(articles = links.len(), min_count, "Loaded article list");

    // Comment fetches are not retried: a flaky article aborts quickly and
    // the run moves on to the next one.
    let fetcher = NaverFetcher::with_config(
        config.comment_timeout(),
        config.request_delay(),
        0,
        config.crawler.user_agent.clone(),
    )?;
    let client = CommentClient::new(fetcher);

    let path = resolve_output(config, output)?;
    let mut stats = CommentRunStats::default();

    for (idx, link) in links.iter().enumerate() {
        tracing::debug!(article = idx + 1, total = links.len(), url = %link, "Collecting comments");

        let comments = client.collect_article(link, min_count).await;

        if comments.is_empty() {
            stats.articles_skipped += 1;
            continue;
        }

        storage::append_comments(&path, &comments)?;
        stats.articles_collected += 1;
        stats.comments_collected += comments.len();
    }

    tracing::info!(
        articles_collected = stats.articles_collected,
        articles_skipped = stats.articles_skipped,
        comments = stats.comments_collected,
        output = %path.display(),
        "Comment collection finished"
    );
    println!(
        "Saved {} comments from {} articles ({} skipped) -> {}",
        stats.comments_collected,
        stats.articles_collected,
        stats.articles_skipped,
        path.display()
    );

    Ok(())
}
