//! CLI command handlers.
//!
//! Handlers hold the logic of each subcommand so that `main.rs` only parses
//! arguments and dispatches.

mod history;
mod notifications;
mod output;
mod refresh;
mod setup;
mod watch;

pub use history::{run_history, HistoryView};
pub use notifications::{run_notifications, NotificationAction};
pub use output::{
    exit_codes, render_analytics, render_changelog, render_cycle_report, write_output,
    OutputTarget,
};
pub use refresh::run_refresh;
pub use setup::{build_pipeline, build_source, open_store, snapshot_store, CliPipeline};
pub use watch::{parse_duration, run_watch, WatchError, WatchOptions, MIN_INTERVAL};
