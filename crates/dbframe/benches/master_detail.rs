use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dbframe::prelude::*;
use std::collections::HashMap;

#[derive(Default, ReadFields)]
struct Order {
    #[orm(id)]
    order_id: i64,
    customer: String,
    #[orm(skip)]
    lines: Vec<Line>,
}

#[derive(Default, ReadFields)]
struct Line {
    line_no: i64,
    qty: i64,
}

/// `parents` orders with `children` lines each, joined and flattened.
fn joined_rows(parents: i64, children: i64) -> MemoryDataset {
    let mut ds = MemoryDataset::new(["order_id", "customer", "line_no", "qty"]);
    for p in 0..parents {
        for c in 0..children {
            ds.push_row(vec![
                Value::Int(p),
                Value::from(format!("customer-{p}")),
                Value::Int(c),
                Value::Int(p * c),
            ])
            .unwrap();
        }
    }
    ds
}

fn bench_master_detail(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader/master_detail");

    for parents in [10, 100, 1000] {
        let mut ds = joined_rows(parents, 10);
        group.bench_with_input(BenchmarkId::from_parameter(parents), &parents, |b, _| {
            b.iter(|| {
                let mut reader = MasterDetailReader::new(
                    column::<i64>("order_id"),
                    fields::<Order>(),
                    |_: &Order| {
                        Some(Project::new(
                            |o: &mut Order| &mut o.lines,
                            ObjectReader::new(fields::<Line>()),
                        ))
                    },
                );
                let mut orders: HashMap<i64, Order> = HashMap::new();
                Executor::default()
                    .read_all(&mut ds, &mut reader, &mut orders)
                    .unwrap();
                black_box(orders.len());
            });
        });
    }

    group.finish();
}

fn bench_object_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader/object");

    for rows in [100, 1000, 10_000] {
        let mut ds = joined_rows(rows, 1);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| {
                let mut lines: Vec<Line> = Vec::new();
                Executor::default()
                    .read_all(&mut ds, &mut ObjectReader::new(fields::<Line>()), &mut lines)
                    .unwrap();
                black_box(lines.len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_master_detail, bench_object_reader);
criterion_main!(benches);
