//! Rendering a history log as a list of per-snapshot changes.

use crate::diff::{ChangeSet, DiffEngine};
use crate::store::HistoricalSnapshot;
use serde::Serialize;

/// One row of a changelog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChangelogEntry {
    /// The oldest retained snapshot, or one written under a different
    /// schema version than its predecessor.
    Baseline { timestamp: i64 },
    /// A snapshot and what changed relative to the one before it.
    Changes { timestamp: i64, changes: ChangeSet },
}

impl ChangelogEntry {
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        match self {
            Self::Baseline { timestamp } | Self::Changes { timestamp, .. } => *timestamp,
        }
    }

    #[must_use]
    pub const fn is_baseline(&self) -> bool {
        matches!(self, Self::Baseline { .. })
    }

    #[must_use]
    pub const fn changes(&self) -> Option<&ChangeSet> {
        match self {
            Self::Baseline { .. } => None,
            Self::Changes { changes, .. } => Some(changes),
        }
    }
}

/// Changelog with the default engine.
#[must_use]
pub fn changelog(history: &[HistoricalSnapshot]) -> Vec<ChangelogEntry> {
    changelog_with(&DiffEngine::new(), history)
}

/// Build a changelog, newest first.
///
/// Each snapshot is compared with its predecessor; snapshots identical to
/// their predecessor are left out. The oldest snapshot is a baseline, and so
/// is any snapshot whose schema version differs from its predecessor's.
#[must_use]
pub fn changelog_with(engine: &DiffEngine, history: &[HistoricalSnapshot]) -> Vec<ChangelogEntry> {
    let mut entries = Vec::with_capacity(history.len());
    for (index, snapshot) in history.iter().enumerate().rev() {
        let previous = index.checked_sub(1).map(|i| &history[i]);
        let Some(previous) = previous.filter(|p| p.schema_version == snapshot.schema_version) else {
            entries.push(ChangelogEntry::Baseline {
                timestamp: snapshot.timestamp,
            });
            continue;
        };
        let changes = engine.compare(&previous.data, &snapshot.data);
        if !changes.is_empty() {
            entries.push(ChangelogEntry::Changes {
                timestamp: snapshot.timestamp,
                changes,
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_history_has_empty_changelog() {
        assert!(changelog(&[]).is_empty());
    }

    #[test]
    fn test_changelog_is_newest_first_with_baseline_last() {
        let history = vec![
            HistoricalSnapshot::new(1, json!({"status": "BOOKED"})),
            HistoricalSnapshot::new(2, json!({"status": "BOOKED"})),
            HistoricalSnapshot::new(3, json!({"status": "DELIVERED"})),
        ];
        let entries = changelog(&history);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp(), 3);
        assert!(entries[0].changes().unwrap().contains("status"));
        assert!(entries[1].is_baseline());
        assert_eq!(entries[1].timestamp(), 1);
    }

    #[test]
    fn test_ignored_paths_hide_entries() {
        let history = vec![
            HistoricalSnapshot::new(1, json!({"meta": 1})),
            HistoricalSnapshot::new(2, json!({"meta": 2})),
        ];
        let engine = DiffEngine::new().with_ignore_paths(["meta"]);
        let entries = changelog_with(&engine, &history);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_baseline());
    }
}
