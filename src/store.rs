//! Durable findings store.
//!
//! The store owns the finding history and its statistics and persists both
//! as one JSON document:
//!
//! ```text
//! {
//!   "lastUpdated": "2026-10-19T06:00:00Z",
//!   "findings": [ { "id": "texas_3f1c…", ... }, ... ],
//!   "stats": { "totalFound": 42, "sourcesMonitored": 51, ... }
//! }
//! ```
//!
//! # Guarantees
//!
//! - Identifiers are unique: appending a known id is a no-op.
//! - Retention keeps the most recently appended findings.
//! - A missing or unreadable file loads as a fresh store.
//! - Writes go to a sibling temp file that is renamed over the target, so the
//!   previous file survives any failed write.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use crate::models::{Finding, Statistics, StoreState};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct FindingStore {
    path: PathBuf,
    state: StoreState,
    ids: HashSet<String>,
}

impl FindingStore {
    /// Read the store at `path`.
    ///
    /// Never fails: a missing file or one that does not parse yields a fresh
    /// state. Findings with malformed timestamps are kept as-is.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the JSON store file
    /// * `sources_monitored` - Size of the configured roster; always replaces
    ///   the persisted count
    ///
    /// # Returns
    ///
    /// A store holding the persisted findings, or an empty one.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>, sources_monitored: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut state = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<StoreState>(&raw) {
                Ok(state) => {
                    info!(findings = state.findings.len(), "Loaded store");
                    state
                }
                Err(e) => {
                    warn!(error = %e, "Store file is corrupt; starting fresh");
                    StoreState::fresh(sources_monitored)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No store file yet; starting fresh");
                StoreState::fresh(sources_monitored)
            }
            Err(e) => {
                warn!(error = %e, "Store file unreadable; starting fresh");
                StoreState::fresh(sources_monitored)
            }
        };
        state.stats.sources_monitored = sources_monitored;
        Self::from_state(path, state)
    }

    /// Build a store around an existing state. Duplicate ids in `state` are
    /// dropped, keeping the first occurrence.
    pub fn from_state(path: PathBuf, mut state: StoreState) -> Self {
        let mut ids = HashSet::with_capacity(state.findings.len());
        state.findings.retain(|f| ids.insert(f.id.clone()));
        Self { path, state, ids }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn findings(&self) -> &[Finding] {
        &self.state.findings
    }

    pub fn statistics(&self) -> &Statistics {
        &self.state.stats
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.state.last_updated
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        self.state.findings.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Snapshot of every known identifier.
    pub fn known_ids(&self) -> HashSet<String> {
        self.ids.clone()
    }

    /// Append findings whose id is new, in order. Returns those accepted.
    pub fn append(&mut self, findings: impl IntoIterator<Item = Finding>) -> Vec<Finding> {
        let mut accepted = Vec::new();
        for finding in findings {
            if self.ids.insert(finding.id.clone()) {
                self.state.findings.push(finding.clone());
                accepted.push(finding);
            }
        }
        accepted
    }

    /// Keep only the `max` most recently appended findings.
    pub fn enforce_retention(&mut self, max: usize) -> usize {
        let len = self.state.findings.len();
        if len <= max {
            return 0;
        }
        let evicted = len - max;
        for finding in self.state.findings.drain(..evicted) {
            self.ids.remove(&finding.id);
        }
        info!(evicted, retained = max, "Applied retention cap");
        evicted
    }

    /// Recompute statistics after a cycle that finished at `finished_at`.
    pub fn record_cycle(&mut self, finished_at: DateTime<Utc>, duration: Duration) {
        let stats = &mut self.state.stats;
        stats.total_found = self.state.findings.len();
        stats.last_scan = Some(finished_at);
        stats.last_scan_duration_ms = Some(duration.as_millis() as u64);
        stats.scan_count += 1;
        self.state.last_updated = finished_at;
    }

    /// Findings discovered within `window` before `now`, newest first.
    ///
    /// # Arguments
    ///
    /// * `now` - Reference time the window ends at
    /// * `window` - How far back to look, e.g. 30 days
    ///
    /// # Returns
    ///
    /// Cloned findings sorted by discovery time, descending. Findings with an
    /// unparsable timestamp are always included, after the dated ones.
    pub fn recent_findings_at(&self, now: DateTime<Utc>, window: Duration) -> Vec<Finding> {
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|w| now.checked_sub_signed(w))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut recent: Vec<(Option<DateTime<Utc>>, &Finding)> = self
            .state
            .findings
            .iter()
            .map(|f| (f.found_at(), f))
            .filter(|(at, _)| at.is_none_or(|at| at > cutoff))
            .collect();

        // Some(_) sorts above None, so descending order puts undated last.
        recent.sort_by(|a, b| b.0.cmp(&a.0));
        recent.into_iter().map(|(_, f)| f.clone()).collect()
    }

    pub fn recent_findings(&self, window: Duration) -> Vec<Finding> {
        self.recent_findings_at(Utc::now(), window)
    }

    /// Write the full state atomically.
    ///
    /// The JSON document is written to a `.tmp` sibling and flushed to disk,
    /// then renamed over the store file. The parent directory is synced
    /// afterwards so the rename itself is durable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] if the state cannot be encoded, or
    /// [`StoreError::Write`] if the temp file cannot be written or renamed.
    /// On error the temp file is removed and the previous store file is left
    /// untouched.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.state)?;
        let tmp = temp_path(&self.path);

        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Err(e) = write_synced(&tmp, json.as_bytes()).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(write_err(e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(write_err(e));
        }
        sync_parent_dir(&self.path).await;
        info!(findings = self.state.findings.len(), "Persisted store");
        Ok(())
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// Best effort: failures are logged, the data file is already in place.
#[cfg(unix)]
async fn sync_parent_dir(path: &Path) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let synced = match fs::File::open(dir).await {
        Ok(handle) => handle.sync_all().await,
        Err(e) => Err(e),
    };
    if let Err(e) = synced {
        warn!(dir = %dir.display(), error = %e, "Could not sync store directory");
    }
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) {}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".tmp");
    path.with_file_name(name)
}
