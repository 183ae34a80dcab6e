//! # rfp_sentinel
//!
//! Watches a roster of public procurement portals for healthcare-related
//! opportunities and keeps a deduplicated, size-capped history of what it
//! finds for a human to triage.
//!
//! ## Usage
//!
//! ```sh
//! rfp_sentinel scan                       # one cycle now
//! rfp_sentinel watch                      # cycle now, then every 6 hours
//! rfp_sentinel report --format markdown   # recent findings
//! rfp_sentinel sources                    # configured roster
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: One bounded GET per page with a browser user agent
//! 2. **Extraction**: Generic keyword heuristic, or a placeholder for portals
//!    that cannot be inspected directly
//! 3. **Orchestration**: One task per source, 10 in flight by default
//! 4. **Storage**: Deduplicated append, retention cap, atomic JSON persist

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod crawler;
mod fetch;
mod keywords;
mod models;
mod outputs;
mod scheduler;
mod scrapers;
mod sources;
mod store;
mod utils;

use cli::{Cli, Command, ReportFormat};
use config::Config;
use crawler::{CrawlOrchestrator, CrawlSettings};
use fetch::HttpFetcher;
use scrapers::ExtractorRegistry;
use store::FindingStore;
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }
    info!(
        sources = config.sources.len(),
        data_file = %config.data_file.display(),
        "Loaded configuration"
    );

    match args.command {
        Command::Sources => {
            let registry = ExtractorRegistry::for_sources(&config.sources);
            for source in &config.sources {
                println!(
                    "{:<16} {:<11} {:<32} {}",
                    source.region,
                    registry.resolve(source).name(),
                    source.name,
                    source.url
                );
            }
            Ok(())
        }
        Command::Report { days, format } => {
            let store = FindingStore::load(&config.data_file, config.sources.len()).await;
            let days = days.unwrap_or(config.recent_window_days);
            let window = std::time::Duration::from_secs(u64::from(days) * 24 * 60 * 60);
            let recent = store.recent_findings(window);
            let rendered = match format {
                ReportFormat::Json => {
                    outputs::json::render(&recent, store.statistics(), store.last_updated())?
                }
                ReportFormat::Markdown => {
                    outputs::markdown::render(&recent, store.statistics(), days)
                }
            };
            println!("{}", rendered);
            Ok(())
        }
        Command::Scan => {
            let mut orchestrator = build_orchestrator(&config).await?;
            let report = orchestrator.manual_scan().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.success {
                Ok(())
            } else {
                Err(report.message.into())
            }
        }
        Command::Watch => {
            let mut orchestrator = build_orchestrator(&config).await?;
            info!(
                sources = orchestrator.sources().len(),
                store = %orchestrator.store().path().display(),
                every_hours = config.scan_interval_hours,
                "Watching for new opportunities (Ctrl-C to stop)"
            );
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            scheduler::watch(
                &mut orchestrator,
                config.scan_interval(),
                config.tick(),
                shutdown,
            )
            .await;
            Ok(())
        }
    }
}

/// Wire the orchestrator from configuration. Refuses to start when the store
/// directory is not writable, since no cycle could then be committed.
async fn build_orchestrator(config: &Config) -> Result<CrawlOrchestrator, Box<dyn Error>> {
    if let Err(e) = ensure_writable_parent(&config.data_file).await {
        error!(
            path = %config.data_file.display(),
            error = %e,
            "Store directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let store = FindingStore::load(&config.data_file, config.sources.len()).await;
    let fetcher = Arc::new(HttpFetcher::new()?);
    let registry = ExtractorRegistry::for_sources(&config.sources);

    Ok(CrawlOrchestrator::new(
        CrawlSettings::from(config),
        config.sources.clone(),
        config.vocabulary(),
        fetcher,
        registry,
        store,
    ))
}
