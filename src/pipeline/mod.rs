//! Change detection pipeline.
//!
//! A refresh cycle fetches the current orders, compares each against the
//! latest stored snapshot, appends a new snapshot when something changed and
//! hands the resulting change sets to the configured alert sinks.

mod clock;
mod cycle;
mod source;

pub use clock::{Clock, SystemClock};
pub use cycle::{
    reference_number, ChangePipeline, CycleReport, CycleState, RefreshTrigger,
    DEFAULT_REFERENCE_POINTER,
};
#[cfg(feature = "http")]
pub use source::HttpOrderSource;
pub use source::{extract_orders, Credential, JsonFileSource, OrderSource};
