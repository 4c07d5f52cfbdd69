//! Configuration for order-tracker.
//!
//! - Typed sections with serde defaults and a JSON Schema
//! - Field-level validation
//! - Named presets
//! - YAML file discovery and CLI merging
//!
//! # Configuration File
//!
//! Place a `.order-tracker.yaml` file in the working directory or in
//! `~/.config/order-tracker/`:
//!
//! ```yaml
//! store:
//!   max_snapshots: 200
//! source:
//!   orders_file: ./orders.json
//! diff:
//!   ignore_paths: [details.fetchedAt]
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use file::{
    default_config_path, discover_config_file, generate_example_config,
    generate_full_example_config, load_config_file, load_or_default, ConfigFileError,
};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DiffConfig, NotificationConfig, OutputConfig,
    OutputFormat, SourceConfig, StoreConfig,
};
pub use validation::{ConfigError, Validatable};

/// JSON Schema for the config file format, for editor validation and
/// completion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
