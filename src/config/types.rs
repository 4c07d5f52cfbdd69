//! Configuration types for order-tracker.

use crate::diff::DiffEngine;
use crate::notify::{
    DisplayLabels, NotificationPolicy, ALERT_AUTO_DISMISS, DEFAULT_ALERT_TITLE, DEFAULT_MAX_FIELDS,
};
use crate::pipeline::DEFAULT_REFERENCE_POINTER;
use crate::store::{DEFAULT_MAX_SNAPSHOTS, HISTORY_KEY_PREFIX};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a YAML file and overridden by CLI
/// arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Where snapshot histories and preferences are kept
    pub store: StoreConfig,
    /// Where orders are fetched from
    pub source: SourceConfig,
    /// Alert text and labels
    pub notifications: NotificationConfig,
    /// Diff engine tuning
    pub diff: DiffConfig,
    /// Report output
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Resolved data directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.store
            .data_dir
            .clone()
            .unwrap_or_else(crate::store::default_data_dir)
    }

    /// Diff engine configured from the `diff` section.
    #[must_use]
    pub fn diff_engine(&self) -> DiffEngine {
        let engine = DiffEngine::new().with_ignore_paths(self.diff.ignore_paths.iter().cloned());
        match self.diff.max_depth {
            Some(depth) => engine.with_max_depth(depth),
            None => engine,
        }
    }

    /// Default labels overlaid with the configured ones.
    #[must_use]
    pub fn display_labels(&self) -> DisplayLabels {
        let mut labels = DisplayLabels::default();
        labels.extend(&self.notifications.labels);
        labels
    }

    /// Notification policy configured from the `notifications` section.
    #[must_use]
    pub fn notification_policy(&self) -> NotificationPolicy {
        NotificationPolicy::new()
            .with_title(self.notifications.title.clone())
            .with_max_fields(self.notifications.max_fields)
            .with_auto_dismiss(Duration::from_secs(self.notifications.auto_dismiss_secs))
            .with_labels(self.display_labels())
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Fluent builder for `AppConfig`.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.store.data_dir = dir;
        self
    }

    pub const fn max_snapshots(mut self, max: usize) -> Self {
        self.config.store.max_snapshots = max;
        self
    }

    pub fn orders_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.source.orders_file = file;
        self
    }

    pub fn url(mut self, url: Option<String>) -> Self {
        self.config.source.url = url;
        self
    }

    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    pub fn ignore_paths(mut self, paths: Vec<String>) -> Self {
        self.config.diff.ignore_paths = paths;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StoreConfig {
    /// Data directory (defaults to the platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Namespace for history keys
    pub key_prefix: String,
    /// Snapshots kept per order; 0 keeps everything
    pub max_snapshots: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key_prefix: HISTORY_KEY_PREFIX.to_string(),
            max_snapshots: DEFAULT_MAX_SNAPSHOTS,
        }
    }
}

// ============================================================================
// Source
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceConfig {
    /// Read orders from this JSON file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders_file: Option<PathBuf>,
    /// Fetch orders from this URL (used when no file is set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// JSON pointer to the reference number inside each order
    pub reference_pointer: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            orders_file: None,
            url: None,
            reference_pointer: DEFAULT_REFERENCE_POINTER.to_string(),
            timeout_secs: 30,
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NotificationConfig {
    /// Alert title
    pub title: String,
    /// Changed fields named in an alert body
    pub max_fields: usize,
    /// Seconds before an alert is dismissed
    pub auto_dismiss_secs: u64,
    /// Extra or replacement display labels, keyed by dotted path
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<String, String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_ALERT_TITLE.to_string(),
            max_fields: DEFAULT_MAX_FIELDS,
            auto_dismiss_secs: ALERT_AUTO_DISMISS.as_secs(),
            labels: IndexMap::new(),
        }
    }
}

// ============================================================================
// Diff
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiffConfig {
    /// Dotted paths excluded from comparison
    pub ignore_paths: Vec<String>,
    /// Compare below this depth as whole values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

// ============================================================================
// Output
// ============================================================================

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Write reports here instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// ============================================================================
// Behavior
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.key_prefix, "tesla-order-history-");
        assert_eq!(config.store.max_snapshots, 500);
        assert_eq!(config.source.reference_pointer, "/order/referenceNumber");
        assert_eq!(config.notifications.max_fields, 3);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .max_snapshots(10)
            .output_format(OutputFormat::Json)
            .quiet(true)
            .build();
        assert_eq!(config.store.max_snapshots, 10);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.behavior.quiet);
    }

    #[test]
    fn test_diff_engine_honors_ignore_paths() {
        let config = AppConfig::builder()
            .ignore_paths(vec!["meta".to_string()])
            .build();
        let changes = config
            .diff_engine()
            .compare(&json!({"meta": 1, "a": 1}), &json!({"meta": 2, "a": 1}));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_label_overrides() {
        let mut config = AppConfig::default();
        config
            .notifications
            .labels
            .insert("order.vin".to_string(), "Vehicle ID".to_string());
        assert_eq!(config.display_labels().label_for("order.vin"), "Vehicle ID");
        assert_eq!(
            config.display_labels().label_for("order.mktOptions"),
            "Options"
        );
    }
}
