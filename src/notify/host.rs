//! The notification capability of the host environment.

use super::policy::{Alert, PermissionState};
use crate::error::{ErrorContext, NotificationErrorKind, Result, TrackerError};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::Duration;

/// Key under which [`ConsoleHost`] persists its permission decision.
pub const PERMISSION_KEY: &str = "notification-permission";

/// A displayed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationHandle {
    pub tag: String,
    pub shown_at: DateTime<Utc>,
    pub auto_dismiss: Duration,
}

impl NotificationHandle {
    #[must_use]
    pub fn new(alert: &Alert) -> Self {
        Self {
            tag: alert.tag.clone(),
            shown_at: Utc::now(),
            auto_dismiss: alert.auto_dismiss,
        }
    }

    /// Whether the host should have dismissed this notification by `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        chrono::Duration::from_std(self.auto_dismiss)
            .is_ok_and(|ttl| now >= self.shown_at + ttl)
    }
}

/// Operations a host environment offers for system notifications.
pub trait NotificationHost {
    fn is_supported(&self) -> bool;

    fn permission_state(&self) -> PermissionState;

    /// Ask the user for permission. Only a host whose state is
    /// [`PermissionState::Default`] may actually prompt.
    fn request_permission(&mut self) -> PermissionState;

    fn show(&mut self, alert: &Alert) -> Result<NotificationHandle>;
}

/// Request permission with the usual guard rails: unsupported hosts read as
/// denied, an existing grant is returned as is, and a denial is never
/// re-prompted.
pub fn request_permission(host: &mut impl NotificationHost) -> PermissionState {
    if !host.is_supported() {
        return PermissionState::Denied;
    }
    match host.permission_state() {
        PermissionState::Granted => PermissionState::Granted,
        PermissionState::Denied => PermissionState::Denied,
        PermissionState::Default => host.request_permission(),
    }
}

// ============================================================================
// Console host
// ============================================================================

/// Terminal host: notifications are written as a banner line to stderr and
/// the permission decision is persisted in a key-value store.
///
/// Running the tool is taken as consent, so a prompt from the default state
/// grants permission. A recorded denial sticks until changed with
/// [`ConsoleHost::set_permission`].
pub struct ConsoleHost<K> {
    store: K,
    out: Box<dyn Write + Send>,
}

impl<K: KeyValueStore> ConsoleHost<K> {
    pub fn new(store: K) -> Self {
        Self::with_writer(store, Box::new(std::io::stderr()))
    }

    pub fn with_writer(store: K, out: Box<dyn Write + Send>) -> Self {
        Self { store, out }
    }

    /// Record a permission decision.
    pub fn set_permission(&self, state: PermissionState) -> Result<()> {
        let written = match state {
            PermissionState::Default => self.store.remove(PERMISSION_KEY),
            _ => self.store.set(PERMISSION_KEY, &state.to_string()),
        };
        written.context("recording notification permission")
    }
}

impl<K: KeyValueStore> NotificationHost for ConsoleHost<K> {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission_state(&self) -> PermissionState {
        match self.store.get(PERMISSION_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or(PermissionState::Default),
            Ok(None) => PermissionState::Default,
            Err(e) => {
                tracing::warn!("Failed to read notification permission: {e}");
                PermissionState::Default
            }
        }
    }

    fn request_permission(&mut self) -> PermissionState {
        match self.permission_state() {
            PermissionState::Default => {
                if let Err(e) = self.set_permission(PermissionState::Granted) {
                    tracing::warn!("{e}");
                }
                PermissionState::Granted
            }
            decided => decided,
        }
    }

    fn show(&mut self, alert: &Alert) -> Result<NotificationHandle> {
        if self.permission_state() != PermissionState::Granted {
            return Err(TrackerError::notification(
                format!("showing {}", alert.tag),
                NotificationErrorKind::PermissionDenied,
            ));
        }
        writeln!(self.out, "🔔 {}  {}", alert.title, alert.body).map_err(|e| {
            TrackerError::notification(
                format!("showing {}", alert.tag),
                NotificationErrorKind::ShowFailed(e.to_string()),
            )
        })?;
        Ok(NotificationHandle::new(alert))
    }
}
