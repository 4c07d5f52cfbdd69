//! Alert sinks for refresh cycles.
//!
//! Sinks receive every persisted change set plus an end-of-cycle report:
//! system notifications through a [`NotificationHost`], human-readable
//! lines on stderr, or NDJSON for other programs.

use super::host::NotificationHost;
use super::labels::DisplayLabels;
use super::policy::{should_notify, toast_for, NotificationPolicy};
use crate::diff::ChangeSet;
use crate::pipeline::{CycleReport, RefreshTrigger};
use crate::store::{load_notification_preference, KeyValueStore};
use std::io::Write;

/// Receives refresh cycle events.
pub trait AlertSink {
    /// Called once per order whose new snapshot was persisted.
    fn on_order_change(&mut self, reference_number: &str, changes: &ChangeSet)
        -> anyhow::Result<()>;

    /// Called after every successful cycle.
    fn on_cycle_complete(&mut self, _report: &CycleReport) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called when the order fetch failed and the cycle was aborted.
    fn on_cycle_failed(&mut self, _trigger: RefreshTrigger, _message: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Host sink — system notifications, gated on permission and preference
// ============================================================================

/// Shows one system notification per changed order when the host grants
/// permission and the user opted in. The opt-in flag is re-read from the
/// preference store on every change so a toggle takes effect immediately.
pub struct HostAlertSink<H, K> {
    host: H,
    preferences: K,
    policy: NotificationPolicy,
}

impl<H: NotificationHost, K: KeyValueStore> HostAlertSink<H, K> {
    pub fn new(host: H, preferences: K, policy: NotificationPolicy) -> Self {
        Self {
            host,
            preferences,
            policy,
        }
    }

    pub const fn host(&self) -> &H {
        &self.host
    }
}

impl<H: NotificationHost, K: KeyValueStore> AlertSink for HostAlertSink<H, K> {
    fn on_order_change(
        &mut self,
        reference_number: &str,
        changes: &ChangeSet,
    ) -> anyhow::Result<()> {
        if !self.host.is_supported() {
            return Ok(());
        }
        let preference = load_notification_preference(&self.preferences);
        if !should_notify(self.host.permission_state(), preference) {
            tracing::debug!("Notification for {reference_number} suppressed");
            return Ok(());
        }
        if let Some(alert) = self.policy.build_alert(reference_number, changes) {
            self.host.show(&alert)?;
        }
        Ok(())
    }
}

// ============================================================================
// Stdout sink — human-readable output to stderr
// ============================================================================

pub struct StdoutAlertSink {
    quiet: bool,
    labels: DisplayLabels,
}

impl StdoutAlertSink {
    pub fn new(quiet: bool, labels: DisplayLabels) -> Self {
        Self { quiet, labels }
    }
}

impl AlertSink for StdoutAlertSink {
    fn on_order_change(
        &mut self,
        reference_number: &str,
        changes: &ChangeSet,
    ) -> anyhow::Result<()> {
        let ts = chrono::Local::now().format("%H:%M:%S");
        let fields: Vec<&str> = changes
            .paths()
            .map(|path| self.labels.label_for(path))
            .collect();
        eprintln!(
            "[{ts}] {reference_number}: {} field(s) changed ({})",
            changes.len(),
            fields.join(", ")
        );
        Ok(())
    }

    fn on_cycle_complete(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let ts = chrono::Local::now().format("%H:%M:%S");
        if let Some(toast) = toast_for(report) {
            eprintln!("[{ts}] {}", toast.message);
        }
        for rn in &report.baselines {
            eprintln!("[{ts}] {rn}: initial state recorded");
        }
        Ok(())
    }

    fn on_cycle_failed(&mut self, _trigger: RefreshTrigger, message: &str) -> anyhow::Result<()> {
        let ts = chrono::Local::now().format("%H:%M:%S");
        eprintln!("[{ts}] Refresh failed: {message}");
        Ok(())
    }
}

// ============================================================================
// NDJSON sink — one JSON object per event
// ============================================================================

pub struct NdjsonAlertSink {
    writer: Box<dyn Write + Send>,
}

impl NdjsonAlertSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    fn write_event(&mut self, event: &serde_json::Value) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl AlertSink for NdjsonAlertSink {
    fn on_order_change(
        &mut self,
        reference_number: &str,
        changes: &ChangeSet,
    ) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "change",
            "referenceNumber": reference_number,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "changes": changes,
        });
        self.write_event(&event)
    }

    fn on_cycle_complete(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "cycle",
            "trigger": report.trigger,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "orders": report.orders.len(),
            "changed": report.changes.len(),
            "baselines": report.baselines,
            "skipped": report.skipped,
            "failedWrites": report.failed_writes,
        });
        self.write_event(&event)
    }

    fn on_cycle_failed(&mut self, trigger: RefreshTrigger, message: &str) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "error",
            "trigger": trigger,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "message": message,
        });
        self.write_event(&event)
    }
}

/// Build the console-side sinks: NDJSON when `ndjson` is set, otherwise
/// human-readable stderr lines.
pub fn build_alert_sinks(
    ndjson: Option<Box<dyn Write + Send>>,
    quiet: bool,
    labels: &DisplayLabels,
) -> Vec<Box<dyn AlertSink>> {
    let mut sinks: Vec<Box<dyn AlertSink>> = Vec::new();
    match ndjson {
        Some(writer) => sinks.push(Box::new(NdjsonAlertSink::new(writer))),
        None => sinks.push(Box::new(StdoutAlertSink::new(quiet, labels.clone()))),
    }
    sinks
}
