//! Benchmarks for the diff engine and changelog construction.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use order_tracker::diff::DiffEngine;
use order_tracker::history::changelog;
use order_tracker::store::HistoricalSnapshot;
use serde_json::{json, Value};
use std::hint::black_box;

/// An order shaped like the upstream payload, with `tasks` extra task blocks.
fn order_snapshot(tasks: usize, revision: u64) -> Value {
    let mut extra = serde_json::Map::new();
    for i in 0..tasks {
        extra.insert(
            format!("task{i}"),
            json!({
                "complete": revision % 2 == 0 && i == 0,
                "card": {"title": format!("Task {i}"), "subtitle": null},
                "steps": [1, 2, 3, revision],
            }),
        );
    }
    json!({
        "order": {
            "referenceNumber": "RN100000001",
            "orderStatus": if revision > 2 { "DELIVERED" } else { "BOOKED" },
            "vin": if revision > 0 { Some("5YJ3E1EA7KF000001") } else { None },
            "mktOptions": "APBS,DV2W,IBB1,PMNG,W41B",
        },
        "details": {
            "tasks": {
                "scheduling": {"deliveryWindowDisplay": format!("Window {revision}")},
                "registration": {"orderDetails": {"vehicleOdometer": revision * 3}},
                "extra": extra,
            }
        }
    })
}

fn bench_compare(c: &mut Criterion) {
    let engine = DiffEngine::new();
    let mut group = c.benchmark_group("compare");
    for tasks in [10, 100, 1_000] {
        let previous = order_snapshot(tasks, 0);
        let current = order_snapshot(tasks, 1);
        group.bench_with_input(BenchmarkId::new("changed", tasks), &tasks, |b, _| {
            b.iter(|| engine.compare(black_box(&previous), black_box(&current)));
        });
        group.bench_with_input(BenchmarkId::new("identical", tasks), &tasks, |b, _| {
            b.iter(|| engine.compare(black_box(&previous), black_box(&previous)));
        });
    }
    group.finish();
}

fn bench_changelog(c: &mut Criterion) {
    let history: Vec<HistoricalSnapshot> = (0..200_u32)
        .map(|rev| HistoricalSnapshot::new(i64::from(rev) * 60_000, order_snapshot(50, u64::from(rev))))
        .collect();
    c.bench_function("changelog_200_snapshots", |b| {
        b.iter(|| changelog(black_box(&history)));
    });
}

criterion_group!(benches, bench_compare, bench_changelog);
criterion_main!(benches);
