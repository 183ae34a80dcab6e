//! Command-line interface definitions.
//!
//! Global options can be given as flags or environment variables; every
//! other setting lives in the optional YAML config file.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for rfp_sentinel.
///
/// # Examples
///
/// ```sh
/// # One cycle now, using the built-in roster
/// rfp_sentinel scan
///
/// # Keep watching with a custom config
/// rfp_sentinel --config sentinel.yaml watch
///
/// # Last week's findings as Markdown
/// rfp_sentinel report --days 7 --format markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "RFP_SENTINEL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Store location; overrides `data_file` from the config
    #[arg(short, long, env = "RFP_SENTINEL_DATA_FILE", global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run one crawl cycle now and print the result
    Scan,
    /// Run a cycle now, then keep running on the configured interval
    Watch,
    /// Print statistics and recent findings
    Report {
        /// Window in days; defaults to `recent_window_days` from the config
        #[arg(long)]
        days: Option<u32>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
    },
    /// List configured sources and the extractor each one uses
    Sources,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
}
