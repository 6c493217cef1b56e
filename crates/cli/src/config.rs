// ABOUTME: Run configuration and its command-line/environment front end.
// ABOUTME: Every flag can also be set through the environment variable the collector has always read.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use sismos_scrape::{FetchOptions, BASE_URL, TARGET_URL};
use sismos_store::{StoreOptions, DEFAULT_STORE_ENDPOINT, DEFAULT_TABULAR_PATH};

pub const DEFAULT_LIMIT: usize = 10;

/// Everything one collection run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Cap on the number of records taken from the page.
    pub limit: usize,
    /// Remote table name; `None` writes straight to the CSV file.
    pub keyed_store_target: Option<String>,
    /// CSV destination; `None` means `sismos.csv` in the working directory.
    pub tabular_destination: Option<PathBuf>,
    pub fetch: FetchOptions,
    pub store: StoreOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            keyed_store_target: None,
            tabular_destination: None,
            fetch: FetchOptions::default(),
            store: StoreOptions::default(),
        }
    }
}

impl RunConfig {
    pub fn tabular_path(&self) -> PathBuf {
        self.tabular_destination
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TABULAR_PATH))
    }

    /// Table name if one is configured and non-blank.
    pub fn keyed_target(&self) -> Option<&str> {
        self.keyed_store_target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Scrape the latest reported earthquakes and persist them.
#[derive(Parser, Debug)]
#[command(name = "sismos")]
#[command(about = "Collect recently reported earthquakes from IGP and store them", long_about = None)]
pub struct Args {
    /// Maximum number of records to collect.
    #[arg(long, env = "LIMIT", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Keyed-store table to write to; falls back to CSV when unset or failing.
    /// Requests are unsigned, so the endpoint must be DynamoDB Local or a signing proxy.
    #[arg(long = "table", env = "DDB_TABLE")]
    pub table: Option<String>,

    /// CSV destination path.
    #[arg(long = "csv-path", env = "CSV_PATH")]
    pub csv_path: Option<PathBuf>,

    /// Keyed-store endpoint (DynamoDB Local or a signing proxy; requests are unsigned).
    #[arg(long = "store-endpoint", env = "DDB_ENDPOINT", default_value = DEFAULT_STORE_ENDPOINT)]
    pub store_endpoint: String,

    /// Keyed-store request timeout in seconds (default: HTTP client default).
    #[arg(long = "store-timeout-secs", env = "STORE_TIMEOUT_SECS")]
    pub store_timeout_secs: Option<u64>,

    /// Page listing the reported events.
    #[arg(long = "target-url", env = "SISMOS_TARGET_URL", default_value = TARGET_URL)]
    pub target_url: String,

    /// Base URL used to resolve relative report links.
    #[arg(long = "base-url", env = "SISMOS_BASE_URL", default_value = BASE_URL)]
    pub base_url: String,

    /// Page request timeout in seconds.
    #[arg(long = "fetch-timeout-secs", env = "FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,

    /// Log output format (logs go to stderr).
    #[arg(long = "log-format", env = "SISMOS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

impl Args {
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            limit: self.limit,
            keyed_store_target: self.table.clone(),
            tabular_destination: self.csv_path.clone(),
            fetch: FetchOptions {
                target_url: self.target_url.clone(),
                base_url: self.base_url.clone(),
                timeout: Duration::from_secs(self.fetch_timeout_secs),
                ..FetchOptions::default()
            },
            store: StoreOptions {
                endpoint: self.store_endpoint.clone(),
                timeout: self.store_timeout_secs.map(Duration::from_secs),
            },
        }
    }
}
