//! Whether and how to tell the user about a change.

use super::labels::DisplayLabels;
use crate::diff::ChangeSet;
use crate::pipeline::{CycleReport, RefreshTrigger};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ALERT_TITLE: &str = "Tesla Order Update! 🚗";
pub const DEFAULT_MAX_FIELDS: usize = 3;
pub const ALERT_AUTO_DISMISS: Duration = Duration::from_secs(10);
pub const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(5);

/// Body used when a change set has no paths to name.
pub const GENERIC_ALERT_BODY: &str = "Your order status has been updated";

/// Host-level permission to display system notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// Never asked.
    Default,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl std::str::FromStr for PermissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "default" => Ok(Self::Default),
            other => Err(format!("unknown permission state: {other}")),
        }
    }
}

/// Notify only when the host allows it and the user opted in.
#[must_use]
pub fn should_notify(permission: PermissionState, preference: bool) -> bool {
    permission == PermissionState::Granted && preference
}

/// A system notification ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
    /// Alerts sharing a tag replace each other.
    pub tag: String,
    #[serde(skip)]
    pub auto_dismiss: Duration,
}

/// Notification tag for an order.
#[must_use]
pub fn alert_tag(reference_number: &str) -> String {
    format!("order-{reference_number}")
}

/// Builds alert text from change sets.
#[derive(Debug, Clone)]
pub struct NotificationPolicy {
    title: String,
    max_fields: usize,
    auto_dismiss: Duration,
    labels: DisplayLabels,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            title: DEFAULT_ALERT_TITLE.to_string(),
            max_fields: DEFAULT_MAX_FIELDS,
            auto_dismiss: ALERT_AUTO_DISMISS,
            labels: DisplayLabels::default(),
        }
    }
}

impl NotificationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub const fn with_max_fields(mut self, max_fields: usize) -> Self {
        self.max_fields = max_fields;
        self
    }

    #[must_use]
    pub const fn with_auto_dismiss(mut self, auto_dismiss: Duration) -> Self {
        self.auto_dismiss = auto_dismiss;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: DisplayLabels) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub const fn labels(&self) -> &DisplayLabels {
        &self.labels
    }

    /// `"Changed: a, b, c"` over the first `max_fields` paths, in change set
    /// order, with `"..."` appended when more paths changed than are named.
    #[must_use]
    pub fn summarize(&self, changes: &ChangeSet) -> String {
        let names: Vec<&str> = changes
            .paths()
            .take(self.max_fields)
            .map(|path| self.labels.label_for(path))
            .collect();
        if names.is_empty() {
            GENERIC_ALERT_BODY.to_string()
        } else {
            let more = if changes.len() > self.max_fields { "..." } else { "" };
            format!("Changed: {}{more}", names.join(", "))
        }
    }

    /// The alert for one order's change set; `None` when nothing changed.
    #[must_use]
    pub fn build_alert(&self, reference_number: &str, changes: &ChangeSet) -> Option<Alert> {
        if changes.is_empty() {
            return None;
        }
        Some(Alert {
            title: self.title.clone(),
            body: self.summarize(changes),
            tag: alert_tag(reference_number),
            auto_dismiss: self.auto_dismiss,
        })
    }
}

// ============================================================================
// In-app feedback
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
}

/// Short-lived in-app message about a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    #[serde(skip)]
    pub auto_dismiss: Duration,
}

/// In-app feedback for a finished cycle.
///
/// Changes always produce a success toast. A manual refresh with no changes
/// produces an informational one; an automatic refresh with no changes stays
/// silent.
#[must_use]
pub fn toast_for(report: &CycleReport) -> Option<Toast> {
    if report.has_changes() {
        Some(Toast {
            kind: ToastKind::Success,
            message: "New changes detected!".to_string(),
            auto_dismiss: TOAST_AUTO_DISMISS,
        })
    } else if report.trigger == RefreshTrigger::Manual {
        Some(Toast {
            kind: ToastKind::Info,
            message: "No new changes found.".to_string(),
            auto_dismiss: TOAST_AUTO_DISMISS,
        })
    } else {
        None
    }
}
