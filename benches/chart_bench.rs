//! Benchmarks for the vitals chart adapter and query serialization
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ed_explorer::chart::{ChartOutcome, SeriesVisibility, VitalsChart};
use ed_explorer::model::VitalSign;
use ed_explorer::query::{FilterChange, Gender, QueryDescriptor, SortColumn};

/// Observations in reverse time order, with every seventh heart rate missing
fn create_test_vitals(count: usize) -> Vec<VitalSign> {
    let start = NaiveDate::from_ymd_opt(2180, 7, 23)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();

    (0..count)
        .rev()
        .map(|i| {
            let mut vital = VitalSign::at(start + Duration::minutes(i as i64 * 15))
                .blood_pressure(110.0 + (i % 30) as f64, 70.0 + (i % 15) as f64)
                .o2sat(92.0 + (i % 8) as f64);
            if i % 7 != 0 {
                vital = vital.heartrate(60.0 + (i % 50) as f64);
            }
            vital
        })
        .collect()
}

fn bench_chart(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");

    for size in [100, 1000, 10000] {
        let vitals = create_test_vitals(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("build_{}", size), |b| {
            b.iter(|| VitalsChart::build(black_box(&vitals)))
        });

        let chart = match VitalsChart::build(&vitals) {
            ChartOutcome::Ready(chart) => chart,
            ChartOutcome::NoObservations => unreachable!(),
        };
        let visibility = SeriesVisibility::all();

        group.bench_function(format!("frame_{}", size), |b| {
            b.iter(|| chart.frame(black_box(&visibility)))
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let descriptor = QueryDescriptor::default().with_filter(
        FilterChange::new()
            .gender(Some(Gender::Female))
            .races(["WHITE", "BLACK/AFRICAN AMERICAN", "HISPANIC/LATINO - PUERTO RICAN"])
            .dispositions(["ADMITTED", "LEFT AGAINST MEDICAL ADVICE"])
            .chief_complaint(Some("chest pain")),
    );

    group.bench_function("to_query_string", |b| {
        b.iter(|| black_box(&descriptor).to_query_string())
    });

    group.bench_function("sort_transition", |b| {
        b.iter(|| black_box(&descriptor).with_sort(SortColumn::Disposition))
    });

    group.finish();
}

criterion_group!(benches, bench_chart, bench_query);
criterion_main!(benches);
