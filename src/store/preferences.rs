//! User preferences kept alongside order histories.

use super::kv::KeyValueStore;
use crate::error::Result;

/// Key for the notification opt-in flag.
pub const NOTIFICATION_PREFERENCE_KEY: &str = "notification-enabled";

/// Read the notification opt-in flag. Anything but `"true"` reads as off.
pub fn load_notification_preference(store: &impl KeyValueStore) -> bool {
    match store.get(NOTIFICATION_PREFERENCE_KEY) {
        Ok(value) => value.as_deref() == Some("true"),
        Err(e) => {
            tracing::warn!("Failed to read notification preference: {e}");
            false
        }
    }
}

pub fn save_notification_preference(store: &impl KeyValueStore, enabled: bool) -> Result<()> {
    store.set(NOTIFICATION_PREFERENCE_KEY, if enabled { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_preference_defaults_to_off() {
        assert!(!load_notification_preference(&MemoryStore::new()));
    }

    #[test]
    fn test_preference_roundtrip() {
        let store = MemoryStore::new();
        save_notification_preference(&store, true).unwrap();
        assert!(load_notification_preference(&store));
        save_notification_preference(&store, false).unwrap();
        assert!(!load_notification_preference(&store));
    }

    #[test]
    fn test_unexpected_value_reads_as_off() {
        let store = MemoryStore::new();
        store.set(NOTIFICATION_PREFERENCE_KEY, "yes").unwrap();
        assert!(!load_notification_preference(&store));
    }
}
