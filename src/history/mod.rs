//! Read-side views of stored history: changelogs, per-field timelines and
//! value formatting for display.

mod analytics;
mod changelog;
mod format;

pub use analytics::{
    analyze, DataPoint, HistoryAnalytics, DELIVERY_WINDOW_POINTER, ODOMETER_POINTER,
};
pub use changelog::{changelog, changelog_with, ChangelogEntry};
pub use format::format_value;
