//! Configuration file discovery, loading and merging.

use super::types::{AppConfig, OutputFormat};
use std::path::{Path, PathBuf};

/// Config file names searched in each location, in order.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".order-tracker.yaml",
    ".order-tracker.yml",
    "order-tracker.yaml",
    "order-tracker.yml",
];

/// Locate a config file.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (`~/.config/order-tracker/`)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Config file {} does not exist", path.display());
    }

    std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
        .or_else(|| dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("order-tracker"))))
        .or_else(|| dirs::home_dir().and_then(|home| find_config_in_dir(&home)))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// The default location `config init` writes to.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("order-tracker").join("order-tracker.yaml"))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAMES[0]))
}

// ============================================================================
// Configuration File Loading
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Load the discovered config file, falling back to defaults when there is
/// none or it cannot be parsed.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one; values `other` sets explicitly
    /// win. Used to layer CLI arguments over the file config.
    pub fn merge(&mut self, other: &Self) {
        if other.store.data_dir.is_some() {
            self.store.data_dir.clone_from(&other.store.data_dir);
        }
        if other.source.orders_file.is_some() {
            self.source.orders_file.clone_from(&other.source.orders_file);
        }
        if other.source.url.is_some() {
            self.source.url.clone_from(&other.source.url);
        }
        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        for path in &other.diff.ignore_paths {
            if !self.diff.ignore_paths.contains(path) {
                self.diff.ignore_paths.push(path.clone());
            }
        }
        if other.diff.max_depth.is_some() {
            self.diff.max_depth = other.diff.max_depth;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and merge CLI overrides on top.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// The default configuration as YAML with a short header.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# order-tracker configuration\n\
         # Place this file at .order-tracker.yaml or ~/.config/order-tracker/order-tracker.yaml\n\n{}",
        serde_yaml::to_string(&AppConfig::default()).unwrap_or_default()
    )
}

/// A commented example covering every option.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# order-tracker configuration file
#
# Searched in: the current directory, ~/.config/order-tracker/, then home.
# CLI arguments always override file settings.

store:
  # Where histories and preferences live (default: platform data dir)
  # data_dir: /var/lib/order-tracker
  key_prefix: tesla-order-history-
  # Snapshots kept per order; 0 keeps everything
  max_snapshots: 500

source:
  # Read orders from a JSON export...
  # orders_file: ./orders.json
  # ...or fetch them over HTTP (token from ORDER_TRACKER_TOKEN)
  # url: https://example.com/api/orders
  reference_pointer: /order/referenceNumber
  timeout_secs: 30

notifications:
  title: Tesla Order Update! 🚗
  max_fields: 3
  auto_dismiss_secs: 10
  # labels:
  #   order.vin: Vehicle ID

diff:
  # Paths that never count as changes
  ignore_paths: []
  # max_depth: 6

output:
  # text or json
  format: text
  # file: report.json

behavior:
  quiet: false
"
    .to_string()
}
