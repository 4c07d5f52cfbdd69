//! One refresh cycle: fetch, compare against stored history, persist, notify.

use super::clock::{Clock, SystemClock};
use super::source::{Credential, OrderSource};
use crate::diff::{ChangeSet, DiffEngine};
use crate::error::Result;
use crate::notify::AlertSink;
use crate::store::{HistoricalSnapshot, KeyValueStore, SnapshotStore};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Where the reference number lives inside each order snapshot.
pub const DEFAULT_REFERENCE_POINTER: &str = "/order/referenceNumber";

/// What started a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshTrigger {
    /// Explicit user request; always yields user-visible feedback.
    Manual,
    /// Periodic refresh; silent unless something changed.
    Automatic,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Automatic => write!(f, "automatic"),
        }
    }
}

/// Pipeline phase, observable between and during cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleState {
    Idle,
    Fetching,
    Comparing,
    Persisting,
    Notifying,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Comparing => "comparing",
            Self::Persisting => "persisting",
            Self::Notifying => "notifying",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub trigger: RefreshTrigger,
    /// Epoch milliseconds at which the cycle started.
    pub started_at: i64,
    /// Every order returned by the source, in source order.
    pub orders: Vec<Value>,
    /// Non-empty change sets keyed by reference number, only for orders
    /// whose new snapshot was persisted.
    pub changes: IndexMap<String, ChangeSet>,
    /// Orders that got a fresh baseline this cycle.
    pub baselines: Vec<String>,
    /// Orders with no usable reference number.
    pub skipped: usize,
    /// Orders whose history write failed.
    pub failed_writes: Vec<String>,
}

impl CycleReport {
    fn new(trigger: RefreshTrigger, started_at: i64) -> Self {
        Self {
            trigger,
            started_at,
            orders: Vec::new(),
            changes: IndexMap::new(),
            baselines: Vec::new(),
            skipped: 0,
            failed_writes: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn changes_for(&self, reference_number: &str) -> Option<&ChangeSet> {
        self.changes.get(reference_number)
    }
}

/// Read an order's reference number at `pointer`. Strings and numbers are
/// accepted; anything else (or an empty string) yields `None`.
#[must_use]
pub fn reference_number(order: &Value, pointer: &str) -> Option<String> {
    match order.pointer(pointer)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Drives refresh cycles for every order a source returns.
///
/// `run_cycle` takes `&mut self`, so at most one cycle per pipeline runs at a
/// time and histories have a single writer.
pub struct ChangePipeline<S, F, C = SystemClock> {
    store: SnapshotStore<S>,
    source: F,
    clock: C,
    engine: DiffEngine,
    sinks: Vec<Box<dyn AlertSink>>,
    reference_pointer: String,
    state: CycleState,
}

impl<S: KeyValueStore, F: OrderSource> ChangePipeline<S, F, SystemClock> {
    pub fn new(store: SnapshotStore<S>, source: F) -> Self {
        Self {
            store,
            source,
            clock: SystemClock,
            engine: DiffEngine::new(),
            sinks: Vec::new(),
            reference_pointer: DEFAULT_REFERENCE_POINTER.to_string(),
            state: CycleState::Idle,
        }
    }
}

impl<S: KeyValueStore, F: OrderSource, C: Clock> ChangePipeline<S, F, C> {
    /// Swap the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ChangePipeline<S, F, C2> {
        ChangePipeline {
            store: self.store,
            source: self.source,
            clock,
            engine: self.engine,
            sinks: self.sinks,
            reference_pointer: self.reference_pointer,
            state: self.state,
        }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: DiffEngine) -> Self {
        self.engine = engine;
        self
    }

    /// JSON pointer to the reference number inside each order.
    #[must_use]
    pub fn with_reference_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.reference_pointer = pointer.into();
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn AlertSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    #[must_use]
    pub const fn state(&self) -> CycleState {
        self.state
    }

    #[must_use]
    pub const fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    #[must_use]
    pub const fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// Run one refresh cycle.
    ///
    /// A fetch failure aborts the cycle before anything is compared or
    /// written and is returned to the caller. Per-order write failures are
    /// logged and listed in [`CycleReport::failed_writes`]; the remaining
    /// orders are still processed.
    pub fn run_cycle(
        &mut self,
        credential: &Credential,
        trigger: RefreshTrigger,
    ) -> Result<CycleReport> {
        let started_at = self.clock.now_millis();
        let mut report = CycleReport::new(trigger, started_at);

        self.state = CycleState::Fetching;
        tracing::debug!("Fetching orders from {} source ({trigger})", self.source.name());
        let orders = match self.source.fetch(credential) {
            Ok(orders) => orders,
            Err(e) => {
                self.state = CycleState::Idle;
                tracing::error!("Order fetch failed: {e}");
                let message = e.to_string();
                for sink in &mut self.sinks {
                    if let Err(sink_err) = sink.on_cycle_failed(trigger, &message) {
                        tracing::warn!("Alert sink error: {sink_err}");
                    }
                }
                return Err(e);
            }
        };

        self.state = CycleState::Comparing;
        for order in &orders {
            let Some(rn) = reference_number(order, &self.reference_pointer) else {
                tracing::warn!(
                    "Skipping order without a reference number at {}",
                    self.reference_pointer
                );
                report.skipped += 1;
                continue;
            };
            self.process_order(&rn, order, &mut report);
        }
        report.orders = orders;

        self.state = CycleState::Notifying;
        for sink in &mut self.sinks {
            for (rn, changes) in &report.changes {
                if let Err(e) = sink.on_order_change(rn, changes) {
                    tracing::warn!("Alert sink error: {e}");
                }
            }
            if let Err(e) = sink.on_cycle_complete(&report) {
                tracing::warn!("Alert sink error: {e}");
            }
        }

        tracing::info!(
            "Refresh complete: {} order(s), {} changed, {} baseline(s), {} skipped, {} write failure(s)",
            report.orders.len(),
            report.changes.len(),
            report.baselines.len(),
            report.skipped,
            report.failed_writes.len(),
        );
        self.state = CycleState::Idle;
        Ok(report)
    }

    fn process_order(&mut self, rn: &str, order: &Value, report: &mut CycleReport) {
        self.state = CycleState::Comparing;
        let history = self.store.load_history(rn);
        let now = self.clock.now_millis();

        let Some(last) = history.last() else {
            tracing::info!("Recording initial snapshot for {rn}");
            self.persist(rn, HistoricalSnapshot::new(now, order.clone()), report, None);
            return;
        };

        // Timestamps stay non-decreasing even if the wall clock steps back.
        let timestamp = now.max(last.timestamp);

        if !last.is_current_schema() {
            tracing::info!(
                "Stored snapshot for {rn} uses schema version {}, re-baselining",
                last.schema_version
            );
            self.persist(rn, HistoricalSnapshot::new(timestamp, order.clone()), report, None);
            return;
        }

        let changes = self.engine.compare(&last.data, order);
        if changes.is_empty() {
            tracing::debug!("No changes for {rn}");
            return;
        }
        tracing::info!("{} field(s) changed for {rn}", changes.len());
        self.persist(
            rn,
            HistoricalSnapshot::new(timestamp, order.clone()),
            report,
            Some(changes),
        );
    }

    /// Append `snapshot`; a `None` change set marks a baseline.
    fn persist(
        &mut self,
        rn: &str,
        snapshot: HistoricalSnapshot,
        report: &mut CycleReport,
        changes: Option<ChangeSet>,
    ) {
        self.state = CycleState::Persisting;
        if let Err(e) = self.store.append_snapshot(rn, snapshot) {
            tracing::error!("Failed to persist snapshot for {rn}: {e}");
            report.failed_writes.push(rn.to_string());
            return;
        }
        match changes {
            Some(changes) => {
                report.changes.insert(rn.to_string(), changes);
            }
            None => report.baselines.push(rn.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    struct FixedSource(Vec<Value>);

    impl OrderSource for FixedSource {
        fn fetch(&mut self, _credential: &Credential) -> Result<Vec<Value>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn order(rn: &str, vin: Option<&str>) -> Value {
        json!({"order": {"referenceNumber": rn, "vin": vin}})
    }

    #[test]
    fn test_reference_number_extraction() {
        assert_eq!(
            reference_number(&order("RN1", None), DEFAULT_REFERENCE_POINTER).as_deref(),
            Some("RN1")
        );
        assert_eq!(
            reference_number(&json!({"order": {"referenceNumber": 42}}), DEFAULT_REFERENCE_POINTER)
                .as_deref(),
            Some("42")
        );
        assert!(reference_number(&json!({"order": {}}), DEFAULT_REFERENCE_POINTER).is_none());
        assert!(reference_number(&order("", None), DEFAULT_REFERENCE_POINTER).is_none());
    }

    #[test]
    fn test_first_cycle_records_baseline_without_changes() {
        let store = SnapshotStore::new(MemoryStore::new());
        let mut pipeline = ChangePipeline::new(store, FixedSource(vec![order("RN1", None)]))
            .with_clock(|| 1_000_i64);

        let report = pipeline
            .run_cycle(&Credential::anonymous(), RefreshTrigger::Automatic)
            .unwrap();
        assert!(!report.has_changes());
        assert_eq!(report.baselines, vec!["RN1"]);
        assert_eq!(pipeline.store().load_history("RN1").len(), 1);
        assert_eq!(pipeline.state(), CycleState::Idle);
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let store = SnapshotStore::new(MemoryStore::new());
        store
            .append_snapshot("RN1", HistoricalSnapshot::new(5_000, order("RN1", None)))
            .unwrap();
        let mut pipeline =
            ChangePipeline::new(store, FixedSource(vec![order("RN1", Some("5YJ3"))]))
                .with_clock(|| 1_000_i64);

        pipeline
            .run_cycle(&Credential::anonymous(), RefreshTrigger::Automatic)
            .unwrap();
        let history = pipeline.store().load_history("RN1");
        assert_eq!(history[1].timestamp, 5_000);
    }

    #[test]
    fn test_orders_without_reference_are_skipped() {
        let store = SnapshotStore::new(MemoryStore::new());
        let mut pipeline = ChangePipeline::new(
            store,
            FixedSource(vec![json!({"order": {}}), order("RN1", None)]),
        );
        let report = pipeline
            .run_cycle(&Credential::anonymous(), RefreshTrigger::Manual)
            .unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.orders.len(), 2);
        assert_eq!(report.baselines, vec!["RN1"]);
    }

    #[test]
    fn test_custom_reference_pointer() {
        let store = SnapshotStore::new(MemoryStore::new());
        let mut pipeline =
            ChangePipeline::new(store, FixedSource(vec![json!({"id": "A-1"})]))
                .with_reference_pointer("/id");
        let report = pipeline
            .run_cycle(&Credential::anonymous(), RefreshTrigger::Manual)
            .unwrap();
        assert_eq!(report.baselines, vec!["A-1"]);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RefreshTrigger::Manual.to_string(), "manual");
        assert_eq!(CycleState::Persisting.to_string(), "persisting");
    }
}
