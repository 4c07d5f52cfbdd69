//! Deep diff engine.
//!
//! Walks two JSON values in lock-step and reports leaf-level differences as
//! a flat [`ChangeSet`] keyed by dotted path. Shapes are dispatched at
//! runtime; a shape mismatch is reported as one change at the path where the
//! shapes diverge.
//!
//! Arrays are walked by index up to the longer length. When the lengths
//! differ, an extra entry at the array path carries the old and new lengths.
//!
//! Keys are escaped before joining (see [`escape_segment`]), so a key that
//! contains `.` never collides with a nested path.

use super::changes::ChangeSet;
use serde_json::Value;
use std::borrow::Cow;

/// Configurable deep comparison of two snapshots.
///
/// # Example
///
/// ```
/// use order_tracker::diff::DiffEngine;
/// use serde_json::json;
///
/// let engine = DiffEngine::new().with_ignore_paths(["meta.fetchedAt"]);
/// let changes = engine.compare(
///     &json!({"status": "BOOKED", "meta": {"fetchedAt": 1}}),
///     &json!({"status": "DELIVERED", "meta": {"fetchedAt": 2}}),
/// );
/// assert_eq!(changes.len(), 1);
/// assert!(changes.contains("status"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    ignore_paths: Vec<String>,
    max_depth: Option<usize>,
}

impl DiffEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude dotted paths (and everything below them) from comparison.
    #[must_use]
    pub fn with_ignore_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Stop descending below `depth` levels; deeper subtrees are compared
    /// as whole values. `0` compares the roots as whole values.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Compare `previous` against `current`.
    ///
    /// Paths are reported in the depth-first order of keys in `current`,
    /// followed by keys that only exist in `previous`.
    #[must_use]
    pub fn compare(&self, previous: &Value, current: &Value) -> ChangeSet {
        let mut out = ChangeSet::new();
        self.walk(Some(previous), Some(current), "", 0, &mut out);
        out
    }

    fn walk(
        &self,
        previous: Option<&Value>,
        current: Option<&Value>,
        path: &str,
        depth: usize,
        out: &mut ChangeSet,
    ) {
        if self.is_ignored(path) {
            return;
        }
        let descend = self.max_depth.map_or(true, |max| depth < max);

        match (previous, current) {
            (None, None) => {}
            (Some(Value::Object(prev)), Some(Value::Object(curr))) if descend => {
                for (key, value) in curr {
                    let child = join_path(path, key);
                    self.walk(prev.get(key), Some(value), &child, depth + 1, out);
                }
                for (key, value) in prev {
                    if !curr.contains_key(key) {
                        let child = join_path(path, key);
                        self.walk(Some(value), None, &child, depth + 1, out);
                    }
                }
            }
            (Some(Value::Array(prev)), Some(Value::Array(curr))) if descend => {
                if prev.len() != curr.len() {
                    out.record(
                        path.to_string(),
                        Some(Value::from(prev.len())),
                        Some(Value::from(curr.len())),
                    );
                }
                for index in 0..prev.len().max(curr.len()) {
                    let child = join_path(path, &index.to_string());
                    self.walk(prev.get(index), curr.get(index), &child, depth + 1, out);
                }
            }
            (p, c) => {
                if !values_equal(p, c) {
                    out.record(path.to_string(), p.cloned(), c.cloned());
                }
            }
        }
    }

    fn is_ignored(&self, path: &str) -> bool {
        self.ignore_paths.iter().any(|ignored| {
            path == ignored
                || (path.starts_with(ignored.as_str())
                    && path.as_bytes().get(ignored.len()) == Some(&b'.'))
        })
    }
}

/// Compare two snapshots with the default engine.
#[must_use]
pub fn compare(previous: &Value, current: &Value) -> ChangeSet {
    DiffEngine::new().compare(previous, current)
}

/// Escape one key so it cannot be mistaken for a path separator.
///
/// `~` becomes `~0` and `.` becomes `~1`, so `{"a.b": 1}` is reported at
/// `a~1b` while `{"a": {"b": 1}}` is reported at `a.b`.
#[must_use]
pub fn escape_segment(key: &str) -> Cow<'_, str> {
    if key.contains(['~', '.']) {
        Cow::Owned(key.replace('~', "~0").replace('.', "~1"))
    } else {
        Cow::Borrowed(key)
    }
}

fn join_path(parent: &str, segment: &str) -> String {
    let segment = escape_segment(segment);
    if parent.is_empty() {
        segment.into_owned()
    } else {
        format!("{parent}.{segment}")
    }
}

/// Deep equality where numbers compare by numeric value (`1 == 1.0`).
fn values_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => json_equal(a, b),
        _ => false,
    }
}

fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x == y || matches!((x.as_f64(), y.as_f64()), (Some(l), Some(r)) if l == r)
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| json_equal(v, other)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let snapshot = json!({
            "order": {"referenceNumber": "RN1", "vin": null, "mktOptions": ["A", "B"]},
            "details": {"tasks": {"scheduling": {"deliveryWindowDisplay": "Jun 1 - Jun 7"}}}
        });
        assert!(compare(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn test_vin_assignment_scenario() {
        let previous = json!({"status": "BOOKED", "vin": null});
        let current = json!({"status": "BOOKED", "vin": "5YJ3E1EA7KF000001"});
        let changes = compare(&previous, &current);

        assert_eq!(changes.len(), 1);
        let entry = changes.get("vin").unwrap();
        assert_eq!(entry.old, Some(Value::Null));
        assert_eq!(entry.new, Some(json!("5YJ3E1EA7KF000001")));
    }

    #[test]
    fn test_deep_change_reports_leaf_path_only() {
        let previous = json!({"a": {"b": {"c": 1, "d": 2}}, "e": true});
        let current = json!({"a": {"b": {"c": 5, "d": 2}}, "e": true});
        let changes = compare(&previous, &current);
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["a.b.c"]);
    }

    #[test]
    fn test_missing_key_recorded_as_undefined() {
        let previous = json!({"a": 1});
        let current = json!({"a": 1, "b": {"nested": true}});
        let changes = compare(&previous, &current);
        let entry = changes.get("b").unwrap();
        assert_eq!(entry.old, None);
        assert_eq!(entry.new, Some(json!({"nested": true})));

        let reverse = compare(&current, &previous);
        let entry = reverse.get("b").unwrap();
        assert_eq!(entry.old, Some(json!({"nested": true})));
        assert_eq!(entry.new, None);
    }

    #[test]
    fn test_path_order_follows_current_then_removed_keys() {
        let previous = json!({"gone": 1, "b": 1, "a": 1});
        let current = json!({"a": 2, "b": 2, "added": 3});
        let changes = compare(&previous, &current);
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["a", "b", "added", "gone"]);
    }

    #[test]
    fn test_array_same_length_compared_by_index() {
        let previous = json!({"options": ["PBSB", "W38B", "IBB1"]});
        let current = json!({"options": ["PBSB", "W39B", "IBB1"]});
        let changes = compare(&previous, &current);
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["options.1"]);
    }

    #[test]
    fn test_array_length_change_reported_at_array_path() {
        let previous = json!({"options": ["PBSB"]});
        let current = json!({"options": ["PBSB", "W38B"]});
        let changes = compare(&previous, &current);
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["options", "options.1"]);

        let length = changes.get("options").unwrap();
        assert_eq!(length.old, Some(json!(1)));
        assert_eq!(length.new, Some(json!(2)));

        let added = changes.get("options.1").unwrap();
        assert_eq!(added.old, None);
        assert_eq!(added.new, Some(json!("W38B")));
    }

    #[test]
    fn test_growing_array_reports_changed_elements_by_index() {
        let changes = compare(&json!({"opts": ["A", "B"]}), &json!({"opts": ["A", "C", "D"]}));
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["opts", "opts.1", "opts.2"]);

        let changed = changes.get("opts.1").unwrap();
        assert_eq!(changed.old, Some(json!("B")));
        assert_eq!(changed.new, Some(json!("C")));
        assert!(changes.get("opts.2").unwrap().is_addition());
    }

    #[test]
    fn test_shrinking_array_reports_removed_tail() {
        let changes = compare(&json!([1, 2, 3]), &json!([1]));
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["", "1", "2"]);
        assert_eq!(changes.get("").unwrap().new, Some(json!(1)));
        assert!(changes.get("2").unwrap().is_removal());
    }

    #[test]
    fn test_dotted_key_does_not_collide_with_nested_key() {
        let previous = json!({"a.b": 1, "a": {"b": 1}});
        let current = json!({"a.b": 2, "a": {"b": 3}});
        let changes = compare(&previous, &current);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.get("a~1b").unwrap().new, Some(json!(2)));
        assert_eq!(changes.get("a.b").unwrap().new, Some(json!(3)));
    }

    #[test]
    fn test_escape_segment() {
        assert_eq!(escape_segment("vin"), "vin");
        assert_eq!(escape_segment("a.b"), "a~1b");
        assert_eq!(escape_segment("x~.y"), "x~0~1y");
    }

    #[test]
    fn test_shape_mismatch_is_whole_value_change() {
        let previous = json!({"eta": {"date": "2024-06-01"}});
        let current = json!({"eta": "2024-06-01"});
        let changes = compare(&previous, &current);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("eta").unwrap().old, Some(json!({"date": "2024-06-01"})));
    }

    #[test]
    fn test_non_object_roots_compare_as_scalars() {
        let changes = compare(&json!(1), &json!("1"));
        assert_eq!(changes.len(), 1);
        assert!(changes.contains(""));
        assert!(compare(&json!("same"), &json!("same")).is_empty());
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert!(compare(&json!({"odometer": 12}), &json!({"odometer": 12.0})).is_empty());
        assert!(!compare(&json!({"odometer": 12}), &json!({"odometer": 13})).is_empty());
    }

    #[test]
    fn test_ignore_paths_skip_subtree() {
        let engine = DiffEngine::new().with_ignore_paths(["meta"]);
        let changes = engine.compare(
            &json!({"meta": {"at": 1}, "metadata": 1}),
            &json!({"meta": {"at": 2}, "metadata": 2}),
        );
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["metadata"]);
    }

    #[test]
    fn test_max_depth_compares_whole_subtree() {
        let engine = DiffEngine::new().with_max_depth(1);
        let changes = engine.compare(
            &json!({"details": {"tasks": {"a": 1}}}),
            &json!({"details": {"tasks": {"a": 2}}}),
        );
        let paths: Vec<_> = changes.paths().collect();
        assert_eq!(paths, ["details"]);
    }

    #[test]
    fn test_compare_is_deterministic() {
        let previous = json!({"x": [1, {"y": 2}], "z": null});
        let current = json!({"x": [1, {"y": 3}], "w": false});
        assert_eq!(compare(&previous, &current), compare(&previous, &current));
    }
}
