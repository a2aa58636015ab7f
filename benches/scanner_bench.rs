// SPDX-License-Identifier: MIT

//! Benchmarks for scanning a long sequence into non-overlapping matches.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seqmatch::{Pattern, Scanner};

/// Noise with a `[1, 2, 2]` motif planted every `stride` values.
fn planted_motifs(n: usize, stride: usize) -> Vec<i32> {
    let mut values = vec![9; n];
    let mut i = 0;
    while i + 3 <= n {
        values[i] = 1;
        values[i + 1] = 2;
        values[i + 2] = 2;
        i += stride;
    }
    values
}

fn bench_scan_until_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_until_walk");

    let pattern = Pattern::build(|b| {
        b.value_eq(1).least_one_value_eq(2);
    })
    .unwrap();

    for &n in &[1_000_usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let values = planted_motifs(n, 50);
            b.iter(|| {
                let mut scanner = Scanner::new(black_box(&values));
                let mut matches = 0_usize;
                while scanner.scan_until(&pattern).is_some() {
                    matches += 1;
                }
                matches
            });
        });
    }

    group.finish();
}

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_count");

    let pattern = Pattern::build(|b| {
        b.value_eq(1).least_one_value_eq(2);
    })
    .unwrap();

    for &n in &[1_000_usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let values = planted_motifs(n, 50);
            b.iter(|| pattern.count(black_box(&values)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan_until_walk, bench_count);
criterion_main!(benches);
