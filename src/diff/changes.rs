//! Change-set types produced by the diff engine.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The before/after pair for one changed field path.
///
/// `None` means the field was absent on that side ("undefined"), which is
/// distinct from `Some(Value::Null)`. Absent sides are omitted when
/// serialized, so a round-trip through JSON keeps the distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub old: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub new: Option<Value>,
}

/// Deserialize a field that is present in the input, keeping `null` as
/// `Some(Value::Null)`. Missing fields fall back to `None` via `default`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ChangeEntry {
    #[must_use]
    pub const fn new(old: Option<Value>, new: Option<Value>) -> Self {
        Self { old, new }
    }

    /// The field did not exist before.
    #[must_use]
    pub const fn is_addition(&self) -> bool {
        self.old.is_none() && self.new.is_some()
    }

    /// The field no longer exists.
    #[must_use]
    pub const fn is_removal(&self) -> bool {
        self.old.is_some() && self.new.is_none()
    }

    /// Swap old and new.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            old: self.new,
            new: self.old,
        }
    }
}

/// Ordered mapping from dotted field path to [`ChangeEntry`].
///
/// Insertion order is discovery order; every path is unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: IndexMap<String, ChangeEntry>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ChangeEntry> {
        self.entries.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Changed paths in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(path, entry)` tuples in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChangeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Record a change. A path that was already recorded keeps its position.
    ///
    /// The engine escapes keys before joining, so distinct fields never share
    /// a path.
    pub(crate) fn record(&mut self, path: String, old: Option<Value>, new: Option<Value>) {
        self.entries.insert(path, ChangeEntry::new(old, new));
    }
}

impl FromIterator<(String, ChangeEntry)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (String, ChangeEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, ChangeEntry);
    type IntoIter = indexmap::map::IntoIter<String, ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = (&'a String, &'a ChangeEntry);
    type IntoIter = indexmap::map::Iter<'a, String, ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_set_empty() {
        let set = ChangeSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_entry_keeps_null_distinct_from_absent() {
        let entry = ChangeEntry::new(Some(Value::Null), Some(json!("5YJ3E1EA7KF000001")));
        let text = serde_json::to_string(&entry).unwrap();
        assert_eq!(text, r#"{"old":null,"new":"5YJ3E1EA7KF000001"}"#);

        let back: ChangeEntry = serde_json::from_str(&text).unwrap();
        assert_eq!(back.old, Some(Value::Null));
    }

    #[test]
    fn test_entry_absent_side_is_omitted() {
        let entry = ChangeEntry::new(None, Some(json!(3)));
        assert!(entry.is_addition());
        let text = serde_json::to_string(&entry).unwrap();
        assert_eq!(text, r#"{"new":3}"#);

        let back: ChangeEntry = serde_json::from_str(&text).unwrap();
        assert_eq!(back.old, None);
    }

    #[test]
    fn test_change_set_preserves_insertion_order() {
        let mut set = ChangeSet::new();
        set.record("z".to_string(), None, Some(json!(1)));
        set.record("a".to_string(), None, Some(json!(2)));
        let paths: Vec<_> = set.paths().collect();
        assert_eq!(paths, ["z", "a"]);
    }

    #[test]
    fn test_reversed_swaps_sides() {
        let entry = ChangeEntry::new(Some(json!(1)), None).reversed();
        assert_eq!(entry.old, None);
        assert_eq!(entry.new, Some(json!(1)));
        assert!(entry.is_addition());
    }

    #[test]
    fn test_removal_requires_old_and_absent_new() {
        assert!(ChangeEntry::new(Some(json!("BOOKED")), None).is_removal());
        assert!(!ChangeEntry::new(Some(json!("BOOKED")), Some(Value::Null)).is_removal());
        assert!(!ChangeEntry::new(None, Some(json!(1))).is_removal());
    }
}
