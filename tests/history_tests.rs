//! Read-side history views built from stored snapshots.

use order_tracker::diff::DiffEngine;
use order_tracker::history::{analyze, changelog, changelog_with, ChangelogEntry};
use order_tracker::store::HistoricalSnapshot;
use serde_json::{json, Value};

fn snapshot(timestamp: i64, window: Option<&str>, odometer: Value) -> HistoricalSnapshot {
    HistoricalSnapshot::new(
        timestamp,
        json!({
            "order": {"referenceNumber": "RN1", "orderStatus": "BOOKED"},
            "details": {"tasks": {
                "scheduling": {"deliveryWindowDisplay": window},
                "registration": {"orderDetails": {"vehicleOdometer": odometer}}
            }}
        }),
    )
}

fn sample_history() -> Vec<HistoricalSnapshot> {
    vec![
        snapshot(1_000, None, Value::Null),
        snapshot(2_000, Some("Nov 1 - Nov 15"), Value::Null),
        snapshot(3_000, Some("Nov 1 - Nov 15"), Value::Null),
        snapshot(4_000, Some("Nov 8 - Nov 22"), json!(15)),
    ]
}

#[test]
fn changelog_is_newest_first_and_ends_with_baseline() {
    let entries = changelog(&sample_history());

    let timestamps: Vec<i64> = entries.iter().map(ChangelogEntry::timestamp).collect();
    // The 3_000 snapshot equals its predecessor and is left out.
    assert_eq!(timestamps, vec![4_000, 2_000, 1_000]);
    assert!(entries.last().unwrap().is_baseline());

    let latest = entries[0].changes().unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest.contains("details.tasks.scheduling.deliveryWindowDisplay"));
    assert!(latest.contains("details.tasks.registration.orderDetails.vehicleOdometer"));
}

#[test]
fn changelog_of_single_snapshot_is_just_the_baseline() {
    let entries = changelog(&sample_history()[..1]);
    assert_eq!(entries, vec![ChangelogEntry::Baseline { timestamp: 1_000 }]);
    assert!(changelog(&[]).is_empty());
}

#[test]
fn changelog_respects_engine_ignores() {
    let engine = DiffEngine::new().with_ignore_paths(["details.tasks.registration"]);
    let entries = changelog_with(&engine, &sample_history());
    let latest = entries[0].changes().unwrap();
    assert_eq!(latest.len(), 1);
}

#[test]
fn schema_version_change_starts_a_new_baseline() {
    let mut legacy = HistoricalSnapshot::new(1_000, json!({"old_shape": 1}));
    legacy.schema_version = 0;
    let history = vec![
        legacy,
        HistoricalSnapshot::new(2_000, json!({"new_shape": 1})),
        HistoricalSnapshot::new(3_000, json!({"new_shape": 2})),
    ];

    let entries = changelog(&history);
    let timestamps: Vec<i64> = entries.iter().map(ChangelogEntry::timestamp).collect();
    assert_eq!(timestamps, vec![3_000, 2_000, 1_000]);

    let latest = entries[0].changes().unwrap();
    assert_eq!(latest.paths().collect::<Vec<_>>(), ["new_shape"]);
    assert!(entries[1].is_baseline());
    assert!(entries[2].is_baseline());
}

#[test]
fn changelog_serializes_with_kind_tag() {
    let entries = changelog(&sample_history()[..2]);
    let value = serde_json::to_value(&entries).unwrap();
    assert_eq!(value[0]["kind"], json!("changes"));
    assert_eq!(value[1], json!({"kind": "baseline", "timestamp": 1_000}));
}

#[test]
fn analytics_tracks_windows_and_odometer() {
    let analytics = analyze(&sample_history());

    assert_eq!(analytics.snapshot_count, 4);
    assert_eq!(analytics.latest_update, Some(4_000));
    assert_eq!(analytics.delivery_windows.len(), 3);
    assert_eq!(
        analytics.distinct_delivery_windows(),
        vec!["Nov 1 - Nov 15", "Nov 8 - Nov 22"]
    );
    assert_eq!(analytics.distinct_odometer_readings(), vec!["15"]);
    assert_eq!(analytics.odometer_readings[0].timestamp, 4_000);
}

#[test]
fn analytics_of_empty_history() {
    let analytics = analyze(&[]);
    assert_eq!(analytics.snapshot_count, 0);
    assert_eq!(analytics.latest_update, None);
    assert!(analytics.delivery_windows.is_empty());
}
