//! Summary statistics over a history log.

use crate::store::HistoricalSnapshot;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;

pub const DELIVERY_WINDOW_POINTER: &str = "/details/tasks/scheduling/deliveryWindowDisplay";
pub const ODOMETER_POINTER: &str = "/details/tasks/registration/orderDetails/vehicleOdometer";

/// A tracked field's value at one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPoint {
    pub timestamp: i64,
    pub value: String,
}

/// What the history log says about an order over time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAnalytics {
    pub snapshot_count: usize,
    pub latest_update: Option<i64>,
    pub delivery_windows: Vec<DataPoint>,
    pub odometer_readings: Vec<DataPoint>,
}

impl HistoryAnalytics {
    /// Distinct delivery windows in order of first appearance.
    #[must_use]
    pub fn distinct_delivery_windows(&self) -> Vec<&str> {
        distinct(&self.delivery_windows)
    }

    #[must_use]
    pub fn distinct_odometer_readings(&self) -> Vec<&str> {
        distinct(&self.odometer_readings)
    }
}

fn distinct(points: &[DataPoint]) -> Vec<&str> {
    points
        .iter()
        .map(|p| p.value.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Read a field for display; `null`, missing and empty values are skipped.
fn field_text(data: &Value, pointer: &str) -> Option<String> {
    match data.pointer(pointer)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[must_use]
pub fn analyze(history: &[HistoricalSnapshot]) -> HistoryAnalytics {
    let series = |pointer: &str| -> Vec<DataPoint> {
        history
            .iter()
            .filter_map(|snapshot| {
                field_text(&snapshot.data, pointer).map(|value| DataPoint {
                    timestamp: snapshot.timestamp,
                    value,
                })
            })
            .collect()
    };

    HistoryAnalytics {
        snapshot_count: history.len(),
        latest_update: history.last().map(|s| s.timestamp),
        delivery_windows: series(DELIVERY_WINDOW_POINTER),
        odometer_readings: series(ODOMETER_POINTER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(ts: i64, window: Value, odometer: Value) -> HistoricalSnapshot {
        HistoricalSnapshot::new(
            ts,
            json!({"details": {"tasks": {
                "scheduling": {"deliveryWindowDisplay": window},
                "registration": {"orderDetails": {"vehicleOdometer": odometer}}
            }}}),
        )
    }

    #[test]
    fn test_empty_history() {
        let stats = analyze(&[]);
        assert_eq!(stats.snapshot_count, 0);
        assert!(stats.latest_update.is_none());
    }

    #[test]
    fn test_series_skip_missing_values() {
        let history = vec![
            snapshot(1, json!(null), json!(null)),
            snapshot(2, json!("Oct 1 - Oct 7"), json!(15)),
            snapshot(3, json!("Oct 8 - Oct 14"), json!(15)),
            snapshot(4, json!("Oct 1 - Oct 7"), json!("")),
        ];
        let stats = analyze(&history);
        assert_eq!(stats.snapshot_count, 4);
        assert_eq!(stats.latest_update, Some(4));
        assert_eq!(stats.delivery_windows.len(), 3);
        assert_eq!(
            stats.distinct_delivery_windows(),
            vec!["Oct 1 - Oct 7", "Oct 8 - Oct 14"]
        );
        assert_eq!(stats.odometer_readings.len(), 2);
        assert_eq!(stats.distinct_odometer_readings(), vec!["15"]);
    }
}
