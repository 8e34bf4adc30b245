use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tabledb::domain::entity::{coerce, Column, ColumnType, Table};

fn bench_coerce(c: &mut Criterion) {
    let cases = [
        ("integer", ColumnType::Integer, "-1234567"),
        ("real", ColumnType::Real, "3.14159"),
        ("money", ColumnType::Money, "9999999999999.99"),
        ("interval", ColumnType::Interval, "8.5-17"),
    ];

    for (label, column_type, raw) in cases {
        c.bench_function(&format!("coerce_{}", label), |b| {
            b.iter(|| coerce(black_box(raw), black_box(&column_type)))
        });
    }
}

fn bench_move_column(c: &mut Criterion) {
    let mut table = Table::new(
        "bench",
        (0..8)
            .map(|i| Column::new(format!("c{}", i), ColumnType::Integer))
            .collect(),
    );
    let row: Vec<String> = (0..8).map(|i| i.to_string()).collect();
    for _ in 0..1_000 {
        table.add_row(&row).unwrap();
    }

    c.bench_function("move_column_1000_rows", |b| {
        b.iter(|| {
            table.move_column(black_box(0), black_box(7)).unwrap();
        })
    });
}

criterion_group!(benches, bench_coerce, bench_move_column);
criterion_main!(benches);
