//! CLI handler for the `history` subcommand.

use super::output::{render_analytics, render_changelog, write_output, OutputTarget};
use super::setup::{open_store, snapshot_store};
use crate::config::{AppConfig, OutputFormat};
use crate::history::{analyze, changelog_with};
use anyhow::{Context, Result};

/// What to show for an order's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryView {
    Changelog,
    Analytics,
    /// Delete the stored history.
    Clear,
}

/// List tracked orders, or show one order's history.
pub fn run_history(
    config: &AppConfig,
    reference_number: Option<&str>,
    view: HistoryView,
) -> Result<()> {
    let store = snapshot_store(config, open_store(config)?);
    let target = OutputTarget::from_option(config.output.file.clone());
    let format = config.output.format;

    let Some(rn) = reference_number else {
        let references = store
            .tracked_references()
            .context("failed to list tracked orders")?;
        let rendered = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&references)?,
            OutputFormat::Text if references.is_empty() => "No orders tracked yet".to_string(),
            OutputFormat::Text => references
                .iter()
                .map(|rn| format!("{rn}  ({} snapshot(s))", store.load_history(rn).len()))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        return write_output(&rendered, &target, config.behavior.quiet);
    };

    match view {
        HistoryView::Clear => {
            store
                .clear_history(rn)
                .with_context(|| format!("failed to clear history for {rn}"))?;
            if !config.behavior.quiet {
                eprintln!("Cleared history for {rn}");
            }
            Ok(())
        }
        HistoryView::Changelog => {
            let history = store.load_history(rn);
            let entries = changelog_with(&config.diff_engine(), &history);
            let rendered = render_changelog(rn, &entries, format)?;
            write_output(&rendered, &target, config.behavior.quiet)
        }
        HistoryView::Analytics => {
            let analytics = analyze(&store.load_history(rn));
            let rendered = render_analytics(rn, &analytics, format)?;
            write_output(&rendered, &target, config.behavior.quiet)
        }
    }
}
