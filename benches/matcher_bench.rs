// SPDX-License-Identifier: MIT

//! Benchmarks for the core matcher.
//!
//! Measures `captures_with_position` throughput at multiple input
//! sizes, for a plain literal chain and for a gap-heavy pattern with a
//! greedy wildcard.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seqmatch::Pattern;

/// `[1, 0, 0, ..., 0, 2]` — a long run of filler between two literals.
fn filler_run(n: usize) -> Vec<i32> {
    let mut values = vec![0; n];
    values[0] = 1;
    values[n - 1] = 2;
    values
}

fn bench_literal_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("captures_literal_chain");

    let pattern = Pattern::build(|b| {
        b.value_eq(1).zero_or_more_value_eq(0).value_eq(2);
    })
    .unwrap();

    for &n in &[100_usize, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let values = filler_run(n);
            b.iter(|| pattern.captures_with_position(black_box(&values)));
        });
    }

    group.finish();
}

fn bench_greedy_wildcard(c: &mut Criterion) {
    let mut group = c.benchmark_group("captures_greedy_wildcard");

    let pattern = Pattern::build(|b| {
        b.value_eq(1).least_one_any().value_eq(2);
    })
    .unwrap();

    for &n in &[100_usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let values = filler_run(n);
            b.iter(|| pattern.captures_with_position(black_box(&values)));
        });
    }

    group.finish();
}

fn bench_no_match_rejection(c: &mut Criterion) {
    let mut group = c.benchmark_group("captures_no_match");

    let pattern = Pattern::build(|b| {
        b.value_eq(1).least_one_value_eq(0).value_eq(7);
    })
    .unwrap();

    for &n in &[1_000_usize, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let values = filler_run(n);
            b.iter(|| pattern.is_match(black_box(&values)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_literal_chain,
    bench_greedy_wildcard,
    bench_no_match_rejection
);
criterion_main!(benches);
