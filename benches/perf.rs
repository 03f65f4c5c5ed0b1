use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use frc_pool::erfinv::erfinv;
use frc_pool::scoring::RegionalPoints;

fn bench_erfinv(c: &mut Criterion) {
    c.bench_function("erfinv_solve", |b| {
        b.iter(|| {
            let y = erfinv(black_box(0.9345794392523364)).unwrap();
            black_box(y);
        })
    });
}

fn bench_pool_sort(c: &mut Criterion) {
    // Synthetic tuples shaped like a season-wide pool.
    let keyed: Vec<(RegionalPoints, u32)> = (0..4096u32)
        .map(|i| {
            let points = RegionalPoints {
                total: i64::from(i % 160),
                playoff: i64::from(i % 30),
                alliance: i64::from(i % 16),
                quals: i64::from(i % 22),
                best1: i64::from(i % 90),
                best2: i64::from(i % 70),
                best3: i64::from(i % 50),
            };
            (points, 10000 - i)
        })
        .collect();

    c.bench_function("pool_sort", |b| {
        b.iter(|| {
            let mut rows = keyed.clone();
            rows.sort_unstable_by(|a, b| b.cmp(a));
            black_box(rows.first().copied());
        })
    });
}

criterion_group!(benches, bench_erfinv, bench_pool_sort);
criterion_main!(benches);
