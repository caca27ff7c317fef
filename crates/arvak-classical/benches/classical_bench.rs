//! Benchmarks for casts and index resolution
//!
//! Run with: cargo bench -p arvak-classical

use arvak_classical::{
    ArrayValue, IndexSpec, ScalarType, ScalarValue, cast, resolve_index_set,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f64::consts::PI;

/// Benchmark the cast matrix on common conversions
fn bench_casts(c: &mut Criterion) {
    let mut group = c.benchmark_group("cast");

    let int = ScalarValue::int(-12345, 32).unwrap();
    group.bench_function("int_to_uint", |b| {
        b.iter(|| cast(black_box(&int), black_box(ScalarType::UInt(32))).unwrap());
    });

    let float = ScalarValue::float(3.0 * PI / 4.0, 64).unwrap();
    group.bench_function("float_to_angle", |b| {
        b.iter(|| cast(black_box(&float), black_box(ScalarType::Angle(20))).unwrap());
    });

    let word = ScalarValue::uint(0xdead_beef, 32).unwrap();
    group.bench_function("uint_to_bits", |b| {
        b.iter(|| cast(black_box(&word), black_box(ScalarType::Bit(32))).unwrap());
    });

    group.finish();
}

/// Benchmark index-set resolution against growing containers
fn bench_index_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_index_set");

    for length in &[16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("stepped_range", length), length, |b, &n| {
            let spec = IndexSpec::range(0, 3, -1);
            b.iter(|| resolve_index_set(black_box(&spec), black_box(n)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("open_reverse", length), length, |b, &n| {
            let spec = IndexSpec::Range {
                start: None,
                step: Some(-1),
                stop: None,
            };
            b.iter(|| resolve_index_set(black_box(&spec), black_box(n)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark multi-dimensional array slicing
fn bench_array_slicing(c: &mut Criterion) {
    let data = (0..64 * 64)
        .map(|i| ScalarValue::uint(i % 256, 8).unwrap())
        .collect();
    let array = ArrayValue::from_elements(ScalarType::UInt(8), vec![64, 64], data).unwrap();

    c.bench_function("array_column_copy", |b| {
        let subscript = [IndexSpec::full(), IndexSpec::Single(7)];
        b.iter(|| array.get(black_box(&subscript)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_casts,
    bench_index_resolution,
    bench_array_slicing
);
criterion_main!(benches);
