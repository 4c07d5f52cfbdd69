//! CLI handler for the `watch` subcommand: refresh on an interval until
//! interrupted.

use super::setup::{build_pipeline, open_store};
use crate::config::AppConfig;
use crate::pipeline::{Credential, RefreshTrigger};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shortest accepted refresh interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Invalid interval '{0}': expected a number with a unit (ms, s, m, h, d), e.g. 5m")]
    InvalidInterval(String),

    #[error("Interval {0:?} is shorter than the minimum of 10s")]
    IntervalTooShort(Duration),
}

/// Parse a duration such as `30s`, `5m`, `1h`, `2d` or `500ms`.
pub fn parse_duration(s: &str) -> Result<Duration, WatchError> {
    let s = s.trim();
    let invalid = || WatchError::InvalidInterval(s.to_string());

    let (digits, unit) = match s.strip_suffix("ms") {
        Some(digits) => (digits, "ms"),
        None => {
            let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
            s.split_at(split)
        }
    };
    let value: u64 = digits.parse().map_err(|_| invalid())?;

    let secs = match unit {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => value,
        "m" => value.checked_mul(60).ok_or_else(invalid)?,
        "h" => value.checked_mul(3600).ok_or_else(invalid)?,
        "d" => value.checked_mul(86_400).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    Ok(Duration::from_secs(secs))
}

/// Options for a watch session.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub interval: Duration,
    /// Stop after the first cycle that detected a change.
    pub exit_on_change: bool,
    /// Run this many cycles and stop; `None` runs until interrupted.
    pub max_cycles: Option<u64>,
}

/// Run automatic refresh cycles until Ctrl-C.
///
/// The first cycle runs immediately. A failed fetch is reported and the
/// next cycle still runs on schedule.
pub fn run_watch(config: &AppConfig, credential: &Credential, options: &WatchOptions) -> Result<()> {
    if options.interval < MIN_INTERVAL {
        return Err(WatchError::IntervalTooShort(options.interval).into());
    }

    let store = open_store(config)?;
    let mut pipeline = build_pipeline(config, &store, true)?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop_flag = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || stop_flag.store(true, Ordering::Relaxed)) {
            tracing::warn!("Could not install Ctrl-C handler: {e}");
        }
    }

    if !config.behavior.quiet {
        eprintln!(
            "Watching orders every {}s (Ctrl-C to stop)",
            options.interval.as_secs()
        );
    }

    let mut cycles = 0_u64;
    loop {
        cycles += 1;
        match pipeline.run_cycle(credential, RefreshTrigger::Automatic) {
            Ok(report) if options.exit_on_change && report.has_changes() => {
                if !config.behavior.quiet {
                    eprintln!("Change detected, exiting (--exit-on-change)");
                }
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Refresh failed, retrying next interval: {e}"),
        }

        if options.max_cycles.is_some_and(|max| cycles >= max) {
            return Ok(());
        }

        let next = Instant::now() + options.interval;
        while Instant::now() < next {
            if stop.load(Ordering::Relaxed) {
                if !config.behavior.quiet {
                    eprintln!("Shutting down gracefully...");
                }
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(250).min(next.saturating_duration_since(Instant::now())));
        }
    }
}
