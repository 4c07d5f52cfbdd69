//! Configuration validation.

use super::types::{AppConfig, DiffConfig, NotificationConfig, OutputConfig, SourceConfig, StoreConfig};
use crate::error::{Result, TrackerError};

// ============================================================================
// Configuration Error
// ============================================================================

/// A single field that failed validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field name, e.g. `source.reference_pointer`
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// All validation errors folded into one [`TrackerError::Config`].
    fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(TrackerError::config(message))
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.store.validate());
        errors.extend(self.source.validate());
        errors.extend(self.notifications.validate());
        errors.extend(self.diff.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for StoreConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.key_prefix.is_empty() {
            errors.push(ConfigError::new(
                "store.key_prefix",
                "Key prefix must not be empty",
            ));
        }
        if let Some(ref dir) = self.data_dir {
            if dir.is_file() {
                errors.push(ConfigError::new(
                    "store.data_dir",
                    format!("Not a directory: {}", dir.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for SourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !self.reference_pointer.starts_with('/') {
            errors.push(ConfigError::new(
                "source.reference_pointer",
                format!(
                    "Must be a JSON pointer starting with '/', got '{}'",
                    self.reference_pointer
                ),
            ));
        }
        if let Some(ref url) = self.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(ConfigError::new(
                    "source.url",
                    format!("Expected an http(s) URL, got '{url}'"),
                ));
            }
        }
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "source.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }
        errors
    }
}

impl Validatable for NotificationConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_fields == 0 {
            errors.push(ConfigError::new(
                "notifications.max_fields",
                "At least one field must be named",
            ));
        }
        if self.title.trim().is_empty() {
            errors.push(ConfigError::new(
                "notifications.title",
                "Title must not be empty",
            ));
        }
        errors
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.ignore_paths
            .iter()
            .filter(|path| path.is_empty() || path.starts_with('.') || path.ends_with('.'))
            .map(|path| {
                ConfigError::new(
                    "diff.ignore_paths",
                    format!("Invalid dotted path '{path}'"),
                )
            })
            .collect()
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_bad_reference_pointer() {
        let mut config = AppConfig::default();
        config.source.reference_pointer = "order.referenceNumber".to_string();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "source.reference_pointer");
    }

    #[test]
    fn test_bad_url_and_timeout() {
        let mut config = AppConfig::default();
        config.source.url = Some("ftp://example.com".to_string());
        config.source.timeout_secs = 0;
        assert_eq!(config.source.validate().len(), 2);
    }

    #[test]
    fn test_bad_ignore_paths() {
        let config = DiffConfig {
            ignore_paths: vec!["ok.path".to_string(), ".leading".to_string(), String::new()],
            max_depth: None,
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn test_output_file_parent_must_exist() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.json")),
            ..OutputConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors[0].field, "output.file");
        assert!(errors[0].to_string().starts_with("output.file: "));
    }

    #[test]
    fn test_ensure_valid_reports_every_field() {
        assert!(AppConfig::default().ensure_valid().is_ok());

        let mut config = AppConfig::default();
        config.store.key_prefix = String::new();
        config.notifications.max_fields = 0;
        match config.ensure_valid() {
            Err(TrackerError::Config(msg)) => {
                assert!(msg.contains("store.key_prefix"), "{msg}");
                assert!(msg.contains("notifications.max_fields"), "{msg}");
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_max_fields_rejected() {
        let mut config = AppConfig::default();
        config.notifications.max_fields = 0;
        assert!(!config.is_valid());
    }
}
