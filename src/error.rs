//! Unified error types for order-tracker.
//!
//! This module provides the error hierarchy for the library, with context
//! chaining so a failure deep in the store or a source reads as a path
//! through the code when it reaches the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for order-tracker operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TrackerError {
    /// The upstream order list could not be fetched. Aborts a refresh cycle.
    #[error("Failed to fetch orders: {context}")]
    Fetch {
        context: String,
        #[source]
        source: FetchErrorKind,
    },

    /// Reading or writing persisted state failed
    #[error("Store operation failed: {context}")]
    Store {
        context: String,
        #[source]
        source: StoreErrorKind,
    },

    /// The notification host refused or failed to deliver
    #[error("Notification failed: {context}")]
    Notification {
        context: String,
        #[source]
        source: NotificationErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific fetch error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FetchErrorKind {
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    #[error("Upstream rejected the request: {0}")]
    Rejected(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No order source configured")]
    NotConfigured,
}

/// Specific store error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreErrorKind {
    #[error("Write failed for key '{key}': {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Read failed for key '{key}': {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Specific notification error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NotificationErrorKind {
    #[error("Notification permission denied")]
    PermissionDenied,

    #[error("Host failed to show notification: {0}")]
    ShowFailed(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for order-tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl TrackerError {
    /// Create a fetch error with context
    pub fn fetch(context: impl Into<String>, source: FetchErrorKind) -> Self {
        Self::Fetch {
            context: context.into(),
            source,
        }
    }

    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: StoreErrorKind) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create a store write error for a key
    pub fn write_failed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::store(
            "writing persisted value",
            StoreErrorKind::WriteFailed {
                key: key.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create a notification error with context
    pub fn notification(context: impl Into<String>, source: NotificationErrorKind) -> Self {
        Self::Notification {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error aborts a whole refresh cycle.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::store(
            "JSON (de)serialization",
            StoreErrorKind::Serialization(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so
/// `load().context("refreshing")` on a store error reads
/// `"refreshing: writing persisted value"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<TrackerError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: TrackerError, new_ctx: &str) -> TrackerError {
    match err {
        TrackerError::Fetch {
            context: existing,
            source,
        } => TrackerError::Fetch {
            context: chain_context(new_ctx, &existing),
            source,
        },
        TrackerError::Store {
            context: existing,
            source,
        } => TrackerError::Store {
            context: chain_context(new_ctx, &existing),
            source,
        },
        TrackerError::Notification {
            context: existing,
            source,
        } => TrackerError::Notification {
            context: chain_context(new_ctx, &existing),
            source,
        },
        TrackerError::Io {
            path,
            message,
            source,
        } => TrackerError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        TrackerError::Config(msg) => TrackerError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
