//! The user-facing notification switch.

use super::host::{request_permission, NotificationHandle, NotificationHost};
use super::policy::{Alert, PermissionState};
use crate::error::Result;
use crate::store::{load_notification_preference, save_notification_preference, KeyValueStore};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const TEST_NOTIFICATION_TITLE: &str = "Test Notification 🔔";
pub const TEST_NOTIFICATION_BODY: &str =
    "Notifications are working! You'll be alerted when your order changes.";
pub const TEST_NOTIFICATION_DISMISS: Duration = Duration::from_secs(5);

/// What the notification switch currently means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unsupported,
    /// The host denied permission; only the user can undo that.
    Blocked,
    Active,
    Inactive,
}

impl NotificationStatus {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Unsupported => "Not supported on this host",
            Self::Blocked => "Blocked - notification permission was denied",
            Self::Active => "Active - you'll be notified of order changes",
            Self::Inactive => "Inactive - toggle to enable",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Derive the status from host support, permission and the stored opt-in.
#[must_use]
pub fn notification_status(
    supported: bool,
    permission: PermissionState,
    preference: bool,
) -> NotificationStatus {
    if !supported {
        NotificationStatus::Unsupported
    } else if permission == PermissionState::Denied {
        NotificationStatus::Blocked
    } else if permission == PermissionState::Granted && preference {
        NotificationStatus::Active
    } else {
        NotificationStatus::Inactive
    }
}

/// The confirmation alert shown when notifications are switched on.
#[must_use]
pub fn test_alert() -> Alert {
    Alert {
        title: TEST_NOTIFICATION_TITLE.to_string(),
        body: TEST_NOTIFICATION_BODY.to_string(),
        tag: "test-notification".to_string(),
        auto_dismiss: TEST_NOTIFICATION_DISMISS,
    }
}

/// Binds a host to the preference store for the toggle flow.
pub struct NotificationSettings<'a, H, K> {
    host: &'a mut H,
    preferences: &'a K,
}

impl<'a, H: NotificationHost, K: KeyValueStore> NotificationSettings<'a, H, K> {
    pub fn new(host: &'a mut H, preferences: &'a K) -> Self {
        Self { host, preferences }
    }

    #[must_use]
    pub fn preference(&self) -> bool {
        load_notification_preference(self.preferences)
    }

    #[must_use]
    pub fn status(&self) -> NotificationStatus {
        notification_status(
            self.host.is_supported(),
            self.host.permission_state(),
            self.preference(),
        )
    }

    /// Flip the switch.
    ///
    /// Without permission this asks for it and, when granted, turns
    /// notifications on. With permission it inverts the stored preference.
    /// Turning notifications on sends a test notification. An unsupported
    /// host is left untouched.
    pub fn toggle(&mut self) -> Result<NotificationStatus> {
        if !self.host.is_supported() {
            return Ok(NotificationStatus::Unsupported);
        }

        if self.host.permission_state() == PermissionState::Granted {
            let enabled = !self.preference();
            save_notification_preference(self.preferences, enabled)?;
            tracing::info!(
                "Notifications {}",
                if enabled { "enabled" } else { "disabled" }
            );
            if enabled {
                self.send_test_quietly();
            }
            return Ok(self.status());
        }

        if request_permission(&mut *self.host) == PermissionState::Granted {
            save_notification_preference(self.preferences, true)?;
            tracing::info!("Notification permission granted, notifications enabled");
            self.send_test_quietly();
        }
        Ok(self.status())
    }

    /// Show the test notification. Returns `None` without permission.
    pub fn send_test(&mut self) -> Result<Option<NotificationHandle>> {
        if !self.host.is_supported() || self.host.permission_state() != PermissionState::Granted {
            return Ok(None);
        }
        self.host.show(&test_alert()).map(Some)
    }

    fn send_test_quietly(&mut self) {
        if let Err(e) = self.send_test() {
            tracing::warn!("Failed to show test notification: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_precedence() {
        assert_eq!(
            notification_status(false, PermissionState::Granted, true),
            NotificationStatus::Unsupported
        );
        assert_eq!(
            notification_status(true, PermissionState::Denied, true),
            NotificationStatus::Blocked
        );
        assert_eq!(
            notification_status(true, PermissionState::Granted, true),
            NotificationStatus::Active
        );
        assert_eq!(
            notification_status(true, PermissionState::Granted, false),
            NotificationStatus::Inactive
        );
        assert_eq!(
            notification_status(true, PermissionState::Default, true),
            NotificationStatus::Inactive
        );
    }

    #[test]
    fn test_status_texts() {
        assert_eq!(NotificationStatus::Inactive.to_string(), "Inactive - toggle to enable");
        assert!(NotificationStatus::Active.is_active());
    }

    #[test]
    fn test_test_alert() {
        let alert = test_alert();
        assert_eq!(alert.title, TEST_NOTIFICATION_TITLE);
        assert_eq!(alert.auto_dismiss, Duration::from_secs(5));
    }
}
