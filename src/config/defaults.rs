//! Named configuration presets.

use super::types::{AppConfig, BehaviorConfig, StoreConfig};

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default settings
    Default,
    /// No console chatter, only reports and alerts
    Quiet,
    /// Keep every snapshot ever recorded
    Archive,
}

impl ConfigPreset {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Quiet => "quiet",
            Self::Archive => "archive",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "quiet" | "silent" => Some(Self::Quiet),
            "archive" | "unbounded" => Some(Self::Archive),
            _ => None,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Bounded history with human-readable output",
            Self::Quiet => "Suppress non-essential output",
            Self::Archive => "Never evict old snapshots",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Quiet, Self::Archive]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Quiet => Self::quiet_preset(),
            ConfigPreset::Archive => Self::archive_preset(),
        }
    }

    #[must_use]
    pub fn quiet_preset() -> Self {
        Self {
            behavior: BehaviorConfig { quiet: true },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn archive_preset() -> Self {
        Self {
            store: StoreConfig {
                max_snapshots: 0,
                ..StoreConfig::default()
            },
            ..Self::default()
        }
    }
}
