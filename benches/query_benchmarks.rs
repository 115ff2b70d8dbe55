//! Performance benchmarks for dataset queries

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rfm_dashboard::config::DashboardConfig;
use rfm_dashboard::dataset::{DatasetStore, Table};
use rfm_dashboard::forecast::{ForecastModel, ForecastParams};
use rfm_dashboard::query::{self, MatchMode};
use rfm_dashboard::DashboardContext;
use std::hint::black_box;
use std::time::Duration;

const MONTHS: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

/// Create a customers table with `size` rows
fn create_customers(size: usize) -> Table {
    let columns = [
        "Cliente",
        "Departamento",
        "Cluster_RFM",
        "mes_favorito",
        "recency",
        "frequency",
        "monetary",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    let rows = (0..size).map(|i| {
        vec![
            format!("cliente_{}", i),
            format!("departamento_{}", i % 32),
            (i % 4).to_string(),
            MONTHS[i % 12].to_string(),
            (i % 365).to_string(),
            (i % 20).to_string(),
            format!("{}.5", i * 3),
        ]
    });
    Table::from_text_rows(columns, rows)
}

fn bench_distinct_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("distinct_values");
    group.measurement_time(Duration::from_secs(5));

    for size in [100, 1_000, 10_000].iter() {
        let table = create_customers(*size);
        group.bench_with_input(BenchmarkId::new("customers", size), &table, |b, table| {
            b.iter(|| query::distinct_values(black_box(table), "Cliente"));
        });
        group.bench_with_input(BenchmarkId::new("departments", size), &table, |b, table| {
            b.iter(|| query::distinct_values(black_box(table), "Departamento"));
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000].iter() {
        let table = create_customers(*size);
        let last = format!("CLIENTE_{}", size - 1);
        group.bench_with_input(BenchmarkId::new("case_insensitive", size), &table, |b, table| {
            b.iter(|| {
                query::find_by_exact_match(
                    black_box(table),
                    "Cliente",
                    &last,
                    MatchMode::CaseInsensitive,
                )
            });
        });
        group.bench_with_input(BenchmarkId::new("filter_exact", size), &table, |b, table| {
            b.iter(|| query::filter_by_column(black_box(table), "Cluster_RFM", "2", MatchMode::Exact));
        });
    }

    group.finish();
}

fn bench_dashboard_operations(c: &mut Criterion) {
    let ctx = DashboardContext::new(
        DatasetStore::from_tables(create_customers(10_000), Table::empty()),
        Some(ForecastModel::new(ForecastParams::new(2.0, 5.0), 32)),
        &DashboardConfig::default(),
    );

    let mut group = c.benchmark_group("dashboard");
    group.bench_function("customers_by_cluster", |b| {
        b.iter(|| ctx.customers_by_cluster(black_box("1")))
    });
    group.bench_function("customers_by_month", |b| {
        b.iter(|| ctx.customers_by_month(black_box("marzo")))
    });
    group.bench_function("customers_by_department", |b| {
        b.iter(|| ctx.customers_by_department(black_box("DEPARTAMENTO_7")))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_distinct_values,
    bench_lookup,
    bench_dashboard_operations
);
criterion_main!(benches);
