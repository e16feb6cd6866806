//! Criterion benchmarks for output parsing and speedup derivation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use parbench_core::measurement::TimingTable;
use parbench_core::parser::parse_output;
use parbench_core::speedup::compute_speedups;

fn noisy_output(lines: usize) -> String {
    let mut out = String::new();
    for i in 0..lines {
        out.push_str(&format!("[rank {i}] progress step {i} of {lines}\n"));
    }
    out.push_str("Result (d): 1.2345e+14\nExecution Time: 0.8421\n");
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_output");
    for &lines in &[0usize, 100, 10_000] {
        let out = noisy_output(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &out, |b, out| {
            b.iter(|| parse_output(out));
        });
    }
    group.finish();
}

#[allow(clippy::cast_precision_loss)]
fn bench_speedups(c: &mut Criterion) {
    let mut table = TimingTable::new();
    for size in [200, 500, 1000] {
        for threads in [1, 2, 4, 8, 16, 32, 64] {
            table.insert_time(size, threads, size as f64 / threads as f64);
        }
    }
    c.bench_function("compute_speedups", |b| b.iter(|| compute_speedups(&table)));
}

criterion_group!(benches, bench_parse, bench_speedups);
criterion_main!(benches);
