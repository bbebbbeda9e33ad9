//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::config::{api, defaults};
use crate::error::{InventoryError, Result};

/// Azure resource inventory exporter CLI
#[derive(Parser, Debug)]
#[command(name = "azinv")]
#[command(version)]
#[command(about = "Export Azure resource inventory via Azure Resource Graph", long_about = None)]
pub struct Cli {
    /// Comma-separated subscription IDs
    #[arg(short, long)]
    pub subs: String,

    /// Output CSV path
    #[arg(short, long, default_value = defaults::OUTPUT_PATH)]
    pub out: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(
        short,
        long,
        default_value = defaults::LOG_LEVEL,
        value_parser = ["off", "error", "warn", "info", "debug", "trace"],
        ignore_case = true
    )]
    pub log_level: String,

    /// Max pages to fetch (safety cap)
    #[arg(
        long,
        default_value_t = defaults::MAX_PAGES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_pages: u32,

    /// Access token (overrides env vars and Azure CLI)
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// Resource Graph endpoint (sovereign clouds)
    #[arg(long, env = "AZINV_ENDPOINT", default_value = api::ENDPOINT)]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = api::REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Disable the progress spinner
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl Cli {
    /// Subscriptions parsed from `--subs`
    pub fn subscriptions(&self) -> Result<Vec<String>> {
        parse_subscriptions(&self.subs)
    }
}

/// Split a comma-separated subscription list, dropping blanks
pub fn parse_subscriptions(subs: &str) -> Result<Vec<String>> {
    let items: Vec<String> = subs
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        return Err(InventoryError::InvalidInput(
            "--subs must contain at least one subscription id".to_string(),
        ));
    }
    Ok(items)
}
