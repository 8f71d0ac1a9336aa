use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgqb::{BulkRow, Param, Schema, and, bulk_insert, col, equal, rebind, select};

/// A `user` schema with `n` extra columns `c0..cn`.
fn wide_schema(n: usize) -> Schema {
    let mut columns = vec!["id".to_string()];
    columns.extend((0..n).map(|i| format!("c{i}")));
    Schema::builder("user")
        .alias("user")
        .primary_key("id")
        .columns(columns)
        .build()
}

/// Build a star SELECT over `schema` with `n` AND-ed equality conditions.
fn build_select(schema: &Schema, n: usize) -> String {
    let conditions: Vec<_> = (0..n).map(|i| equal(col(format!("c{i}")))).collect();
    select([col("*")])
        .from(schema)
        .where_(and(conditions))
        .build()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query/select");

    for n in [1, 5, 10, 50] {
        let schema = wide_schema(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(&schema, n)));
        });
    }

    group.finish();
}

fn bench_bulk_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query/bulk_insert");

    let schema = Schema::builder("user")
        .primary_key("id")
        .columns(["id", "xid", "full_name", "email"])
        .build();

    for rows in [10, 100, 500] {
        let data: Vec<BulkRow> = (0..rows)
            .map(|i| {
                let mut row = HashMap::new();
                row.insert("xid".to_string(), Param::new(format!("u{i}")));
                row.insert("full_name".to_string(), Param::new(format!("user {i}")));
                row.insert("email".to_string(), Param::new(format!("u{i}@example.com")));
                row
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let sql = bulk_insert(&schema, &["*"]).values(data.clone()).build();
                black_box(sql);
            });
        });
    }

    group.finish();
}

fn bench_rebind(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query/rebind");

    for n in [5, 20, 100] {
        let schema = wide_schema(n);
        let sql = build_select(&schema, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(rebind(sql)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_bulk_insert, bench_rebind);
criterion_main!(benches);
