//! Report rendering and output targets.

use crate::config::OutputFormat;
use crate::history::{format_value, ChangelogEntry, HistoryAnalytics};
use crate::pipeline::CycleReport;
use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Exit codes for scripting.
pub mod exit_codes {
    /// Success, no changes detected (or change detection not requested)
    pub const SUCCESS: i32 = 0;
    /// At least one order changed and `--fail-on-change` was given
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Stdout or a file.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// Write `content` to the target.
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Report written to {}", path.display());
            }
            Ok(())
        }
    }
}

/// Local wall-clock rendering of an epoch-millisecond timestamp.
pub(crate) fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| millis.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

// ============================================================================
// Cycle reports
// ============================================================================

pub fn render_cycle_report(report: &CycleReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize report")
        }
        OutputFormat::Text => Ok(render_cycle_text(report)),
    }
}

fn render_cycle_text(report: &CycleReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Refresh at {} ({}): {} order(s), {} changed",
        format_timestamp(report.started_at),
        report.trigger,
        report.orders.len(),
        report.changes.len()
    );
    for (rn, changes) in &report.changes {
        let _ = writeln!(out, "\n{rn}");
        for (path, entry) in changes {
            let _ = writeln!(
                out,
                "  {path}: {} -> {}",
                format_value(entry.old.as_ref()),
                format_value(entry.new.as_ref())
            );
        }
    }
    for rn in &report.baselines {
        let _ = writeln!(out, "\n{rn}: initial state recorded");
    }
    if report.skipped > 0 {
        let _ = writeln!(out, "\n{} order(s) without a reference number skipped", report.skipped);
    }
    for rn in &report.failed_writes {
        let _ = writeln!(out, "\n{rn}: failed to save snapshot, will retry next refresh");
    }
    out.trim_end().to_string()
}

// ============================================================================
// History views
// ============================================================================

pub fn render_changelog(
    reference_number: &str,
    entries: &[ChangelogEntry],
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&serde_json::json!({
            "referenceNumber": reference_number,
            "entries": entries,
        }))
        .context("failed to serialize changelog");
    }

    if entries.is_empty() {
        return Ok(format!("No history recorded for {reference_number}"));
    }

    let mut out = format!("Change history for {reference_number}\n");
    for entry in entries {
        let _ = writeln!(out, "\n{}", format_timestamp(entry.timestamp()));
        match entry {
            ChangelogEntry::Baseline { .. } => {
                let _ = writeln!(out, "  Initial State Recorded");
            }
            ChangelogEntry::Changes { changes, .. } => {
                for (path, change) in changes {
                    let _ = writeln!(out, "  {path}");
                    let _ = writeln!(out, "    - {}", format_value(change.old.as_ref()));
                    let _ = writeln!(out, "    + {}", format_value(change.new.as_ref()));
                }
            }
        }
    }
    Ok(out.trim_end().to_string())
}

pub fn render_analytics(
    reference_number: &str,
    analytics: &HistoryAnalytics,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(analytics).context("failed to serialize analytics");
    }

    let mut out = format!("History analytics for {reference_number}\n");
    let _ = writeln!(out, "  Snapshots:          {}", analytics.snapshot_count);
    let _ = writeln!(
        out,
        "  Latest update:      {}",
        analytics
            .latest_update
            .map_or_else(|| "N/A".to_string(), format_timestamp)
    );
    let _ = writeln!(
        out,
        "  Delivery windows:   {}",
        analytics.distinct_delivery_windows().len()
    );
    for point in &analytics.delivery_windows {
        let _ = writeln!(out, "    {}  {}", format_timestamp(point.timestamp), point.value);
    }
    if !analytics.odometer_readings.is_empty() {
        let _ = writeln!(out, "  Odometer readings:");
        for point in &analytics.odometer_readings {
            let _ = writeln!(out, "    {}  {}", format_timestamp(point.timestamp), point.value);
        }
    }
    Ok(out.trim_end().to_string())
}
