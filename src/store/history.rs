//! Per-order snapshot history.
//!
//! Each order's history is a JSON array of [`HistoricalSnapshot`]s stored
//! under one key derived from its reference number. Every write replaces the
//! whole array, so a failed write leaves the previous history intact.

use super::kv::KeyValueStore;
use crate::error::{ErrorContext, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Namespace for history keys.
pub const HISTORY_KEY_PREFIX: &str = "tesla-order-history-";

/// Version tag written into every new snapshot.
///
/// Records written before versioning existed read back as `0`.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Default retention cap per order.
pub const DEFAULT_MAX_SNAPSHOTS: usize = 500;

/// One timestamped order state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSnapshot {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub data: Value,
    #[serde(default)]
    pub schema_version: u32,
}

impl HistoricalSnapshot {
    /// A snapshot tagged with the current schema version.
    #[must_use]
    pub const fn new(timestamp: i64, data: Value) -> Self {
        Self {
            timestamp,
            data,
            schema_version: SNAPSHOT_SCHEMA_VERSION,
        }
    }

    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Whether this record was written with the current schema version.
    #[must_use]
    pub const fn is_current_schema(&self) -> bool {
        self.schema_version == SNAPSHOT_SCHEMA_VERSION
    }
}

/// Append-only snapshot logs keyed by reference number.
#[derive(Debug, Clone)]
pub struct SnapshotStore<S> {
    backend: S,
    key_prefix: String,
    /// `0` disables the cap.
    max_snapshots: usize,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            key_prefix: HISTORY_KEY_PREFIX.to_string(),
            max_snapshots: DEFAULT_MAX_SNAPSHOTS,
        }
    }

    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Cap the number of snapshots kept per order; oldest are evicted first.
    #[must_use]
    pub const fn with_max_snapshots(mut self, max: usize) -> Self {
        self.max_snapshots = max;
        self
    }

    pub const fn backend(&self) -> &S {
        &self.backend
    }

    #[must_use]
    pub fn history_key(&self, reference_number: &str) -> String {
        format!("{}{reference_number}", self.key_prefix)
    }

    /// Load an order's history, oldest first.
    ///
    /// Unreadable or malformed data is logged and treated as no history.
    pub fn load_history(&self, reference_number: &str) -> Vec<HistoricalSnapshot> {
        let key = self.history_key(reference_number);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read history for {reference_number}: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to parse history for {reference_number}: {e}");
                Vec::new()
            }
        }
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self, reference_number: &str) -> Option<HistoricalSnapshot> {
        self.load_history(reference_number).pop()
    }

    /// Append a snapshot at the tail and persist the whole sequence.
    pub fn append_snapshot(
        &self,
        reference_number: &str,
        snapshot: HistoricalSnapshot,
    ) -> Result<()> {
        let mut history = self.load_history(reference_number);
        history.push(snapshot);
        if self.max_snapshots > 0 && history.len() > self.max_snapshots {
            let excess = history.len() - self.max_snapshots;
            history.drain(..excess);
        }
        self.write_history(reference_number, &history)
    }

    /// Replace an order's history.
    pub fn write_history(
        &self,
        reference_number: &str,
        history: &[HistoricalSnapshot],
    ) -> Result<()> {
        let key = self.history_key(reference_number);
        let payload = serde_json::to_string(history)?;
        self.backend
            .set(&key, &payload)
            .with_context(|| format!("persisting history for {reference_number}"))
    }

    pub fn clear_history(&self, reference_number: &str) -> Result<()> {
        self.backend.remove(&self.history_key(reference_number))
    }

    /// Reference numbers that have a stored history.
    pub fn tracked_references(&self) -> Result<Vec<String>> {
        Ok(self
            .backend
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.key_prefix).map(str::to_string))
            .collect())
    }
}
