//! Configuration management for the daetgul crawler
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Search request timeout in seconds
    pub search_timeout_secs: u64,

    /// Comment API request timeout in seconds
    pub comment_timeout_secs: u64,

    /// Minimum spacing between requests in milliseconds (0 disables throttling)
    pub request_delay_ms: u64,

    /// Maximum retry attempts for search page fetches
    pub max_retries: u32,

    /// Minimum total comment count; articles below it are skipped entirely
    pub min_comment_count: i64,

    /// User agent override; when unset a mobile browser agent is rotated
    pub user_agent: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where CSV files are written
    pub dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let search_timeout_secs = std::env::var("DAETGUL_SEARCH_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        let comment_timeout_secs = std::env::var("DAETGUL_COMMENT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5);

        let request_delay_ms = std::env::var("DAETGUL_REQUEST_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(500);

        let max_retries = std::env::var("DAETGUL_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(2);

        let min_comment_count = std::env::var("DAETGUL_MIN_COMMENT_COUNT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(10);

        let user_agent = std::env::var("DAETGUL_USER_AGENT").ok();

        let dir = std::env::var("DAETGUL_OUTPUT_DIR")
            .unwrap_or_else(|_| String::from("data"))
            .into();

        let level = std::env::var("DAETGUL_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
        let format = std::env::var("DAETGUL_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            crawler: CrawlerConfig {
                search_timeout_secs,
                comment_timeout_secs,
                request_delay_ms,
                max_retries,
                min_comment_count,
                user_agent,
            },
            output: OutputConfig { dir },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawler.search_timeout_secs == 0 {
            anyhow::bail!("search_timeout_secs must be greater than 0");
        }

        if self.crawler.comment_timeout_secs == 0 {
            anyhow::bail!("comment_timeout_secs must be greater than 0");
        }

        if self.crawler.min_comment_count < 0 {
            anyhow::bail!("min_comment_count must not be negative");
        }

        Ok(())
    }

    /// Get search request timeout as Duration
    #[must_use]
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.search_timeout_secs)
    }

    /// Get comment request timeout as Duration
    #[must_use]
    pub fn comment_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.comment_timeout_secs)
    }

    /// Get inter-request spacing as Duration
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.request_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig {
                search_timeout_secs: 10,
                comment_timeout_secs: 5,
                request_delay_ms: 500,
                max_retries: 2,
                min_comment_count: 10,
                user_agent: None,
            },
            output: OutputConfig {
                dir: PathBuf::from("data"),
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
