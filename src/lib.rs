//! **Change detection and snapshot history for vehicle orders.**
//!
//! `order-tracker` polls an order source, compares every order against the
//! last snapshot it recorded, keeps a per-order history of snapshots and
//! tells the user when something changed.
//!
//! ## Core Concepts & Modules
//!
//! - **[`diff`]**: the [`DiffEngine`], a structural comparison of two JSON
//!   snapshots producing a [`ChangeSet`] of dotted paths with old/new values.
//! - **[`store`]**: the [`KeyValueStore`] capability with memory and file
//!   backends, and the [`SnapshotStore`] holding each order's history log.
//! - **[`pipeline`]**: the [`ChangePipeline`] running refresh cycles
//!   (fetch, compare, persist, notify) against an [`OrderSource`].
//! - **[`notify`]**: notification gating, alert text, host capability, alert
//!   sinks and the on/off switch.
//! - **[`history`]**: read-side views of a history log (changelog, analytics).
//! - **[`config`]**: YAML configuration with presets and validation.
//!
//! ## Comparing Two Snapshots
//!
//! ```
//! use order_tracker::diff::compare;
//! use serde_json::json;
//!
//! let previous = json!({"order": {"status": "BOOKED", "vin": null}});
//! let current = json!({"order": {"status": "BOOKED", "vin": "5YJ3E1EA7KF000000"}});
//!
//! let changes = compare(&previous, &current);
//! assert_eq!(changes.len(), 1);
//! let entry = changes.get("order.vin").unwrap();
//! assert_eq!(entry.old, Some(json!(null)));
//! assert_eq!(entry.new, Some(json!("5YJ3E1EA7KF000000")));
//! ```
//!
//! ## Running a Refresh Cycle
//!
//! ```no_run
//! use order_tracker::pipeline::{ChangePipeline, Credential, JsonFileSource, RefreshTrigger};
//! use order_tracker::store::{FileStore, SnapshotStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SnapshotStore::new(FileStore::new("/var/lib/order-tracker")?);
//!     let mut pipeline = ChangePipeline::new(store, JsonFileSource::new("orders.json"));
//!
//!     let report = pipeline.run_cycle(&Credential::anonymous(), RefreshTrigger::Manual)?;
//!     for (rn, changes) in &report.changes {
//!         println!("{rn}: {} field(s) changed", changes.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `http` (default): [`pipeline::HttpOrderSource`], a blocking `reqwest`
//!   client fetching orders with a bearer token.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod history;
pub mod notify;
pub mod pipeline;
pub mod store;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use diff::{compare, ChangeEntry, ChangeSet, DiffEngine};
pub use error::{ErrorContext, Result, TrackerError};
pub use history::{analyze, changelog, format_value, ChangelogEntry, HistoryAnalytics};
pub use notify::{
    should_notify, toast_for, AlertSink, NotificationHost, NotificationPolicy, PermissionState,
};
pub use pipeline::{ChangePipeline, CycleReport, CycleState, OrderSource, RefreshTrigger};
pub use store::{HistoricalSnapshot, KeyValueStore, SnapshotStore};
