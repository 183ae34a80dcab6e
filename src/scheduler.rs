//! Periodic trigger for crawl cycles.
//!
//! Runs one cycle immediately, then wakes every `tick` and starts another
//! cycle once `interval` has passed since the previous one started. Cycles
//! run inline on this loop, one at a time.

use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info, instrument};

use crate::crawler::CrawlOrchestrator;

/// Decides when the next cycle is due.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    last_started: Option<Instant>,
}

impl Schedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_started: None,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_started {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    pub fn mark_started(&mut self, now: Instant) {
        self.last_started = Some(now);
    }
}

/// Drive `orchestrator` until `shutdown` resolves.
#[instrument(
    level = "info",
    skip_all,
    fields(interval_secs = every.as_secs(), tick_secs = tick.as_secs())
)]
pub async fn watch(
    orchestrator: &mut CrawlOrchestrator,
    every: Duration,
    tick: Duration,
    shutdown: impl std::future::Future<Output = ()>,
) {
    let mut schedule = Schedule::new(every);
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested; stopping scheduler");
                break;
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                if !schedule.is_due(now) {
                    debug!("No cycle due");
                    continue;
                }
                schedule.mark_started(now);
                let result = orchestrator.run_crawl_cycle().await;
                info!(new = result.new_findings.len(), "Scheduled cycle finished");
            }
        }
    }
}
