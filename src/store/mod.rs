//! Persistence: the key-value capability, per-order snapshot histories and
//! user preferences.

mod history;
mod kv;
mod preferences;

pub use history::{
    HistoricalSnapshot, SnapshotStore, DEFAULT_MAX_SNAPSHOTS, HISTORY_KEY_PREFIX,
    SNAPSHOT_SCHEMA_VERSION,
};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use preferences::{
    load_notification_preference, save_notification_preference, NOTIFICATION_PREFERENCE_KEY,
};

/// Platform-specific data directory for the default file store.
#[must_use]
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("order-tracker")
}
