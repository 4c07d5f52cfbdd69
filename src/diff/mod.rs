//! Deep diff of order snapshots.
//!
//! Snapshots are schema-less JSON; the engine compares any two
//! [`serde_json::Value`]s and reports the minimal set of changed leaf paths.

mod changes;
mod engine;

pub use changes::{ChangeEntry, ChangeSet};
pub use engine::{compare, escape_segment, DiffEngine};
