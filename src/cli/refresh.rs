//! CLI handler for the `refresh` subcommand.

use super::output::{exit_codes, render_cycle_report, write_output, OutputTarget};
use super::setup::{build_pipeline, open_store};
use crate::config::AppConfig;
use crate::pipeline::{Credential, RefreshTrigger};
use anyhow::Result;

/// Run one manual refresh and print the report. Returns the exit code.
pub fn run_refresh(config: &AppConfig, credential: &Credential, fail_on_change: bool) -> Result<i32> {
    let store = open_store(config)?;
    let mut pipeline = build_pipeline(config, &store, false)?;
    let report = pipeline.run_cycle(credential, RefreshTrigger::Manual)?;

    let rendered = render_cycle_report(&report, config.output.format)?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&rendered, &target, config.behavior.quiet)?;

    if fail_on_change && report.has_changes() {
        return Ok(exit_codes::CHANGES_DETECTED);
    }
    Ok(exit_codes::SUCCESS)
}
