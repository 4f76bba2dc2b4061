//! Benchmark for IndexableDeque vs standard VecDeque.
//!
//! Compares IndexableDeque against Rust's standard VecDeque for the
//! operations both support, and measures the operations only IndexableDeque
//! offers against their closest VecDeque equivalent.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use indexable_deque::IndexableDeque;
use std::collections::VecDeque;
use std::hint::black_box;

/// Fills a deque of `size` elements whose live range wraps.
fn wrapped_deque(size: usize) -> IndexableDeque<usize> {
    let mut deque = IndexableDeque::with_capacity(size + 1);
    for _ in 0..size / 2 {
        deque.push_back(0);
        deque.pop_front();
    }
    deque.extend(0..size);
    deque
}

fn wrapped_vec_deque(size: usize) -> VecDeque<usize> {
    let mut deque = VecDeque::with_capacity(size + 1);
    for _ in 0..size / 2 {
        deque.push_back(0);
        deque.pop_front();
    }
    deque.extend(0..size);
    deque
}

// =============================================================================
// push Benchmark
// =============================================================================

fn benchmark_push(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("push_front_back");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("IndexableDeque", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut deque = IndexableDeque::new();
                    for index in 0..size {
                        if index % 2 == 0 {
                            deque.push_back(black_box(index));
                        } else {
                            deque.push_front(black_box(index));
                        }
                    }
                    black_box(deque)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut deque = VecDeque::with_capacity(16);
                for index in 0..size {
                    if index % 2 == 0 {
                        deque.push_back(black_box(index));
                    } else {
                        deque.push_front(black_box(index));
                    }
                }
                black_box(deque)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark (Random Access)
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let deque = wrapped_deque(size);
        group.bench_with_input(BenchmarkId::new("IndexableDeque", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for index in (0..size).step_by(7) {
                    sum += deque.get(black_box(index)).copied().unwrap_or_default();
                }
                black_box(sum)
            });
        });

        let standard = wrapped_vec_deque(size);
        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for index in (0..size).step_by(7) {
                    sum += standard.get(black_box(index)).copied().unwrap_or_default();
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// insert / remove_at Benchmark
// =============================================================================

fn benchmark_insert_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert_remove_middle");

    for size in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("IndexableDeque", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || wrapped_deque(size),
                |mut deque| {
                    for step in 0..64 {
                        let index = (step * 31) % deque.len();
                        black_box(deque.insert(index, step).is_ok());
                        black_box(deque.remove_at((step * 17) % deque.len()).unwrap_or_default());
                    }
                    deque
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || wrapped_vec_deque(size),
                |mut deque| {
                    for step in 0..64 {
                        let index = (step * 31) % deque.len();
                        deque.insert(index, step);
                        black_box(deque.remove((step * 17) % deque.len()).unwrap_or_default());
                    }
                    deque
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// remove_where Benchmark
// =============================================================================

fn benchmark_remove_where(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove_where");

    for size in [1000, 10000] {
        group.bench_with_input(BenchmarkId::new("IndexableDeque", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || wrapped_deque(size),
                |mut deque| {
                    black_box(deque.remove_where(|value| value % 3 == 0));
                    deque
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || wrapped_vec_deque(size),
                |mut deque| {
                    deque.retain(|value| value % 3 != 0);
                    deque
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// sort Benchmark
// =============================================================================

fn benchmark_sort(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("sort_wrapped");

    for size in [1000, 10000] {
        group.bench_with_input(BenchmarkId::new("IndexableDeque", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || {
                    let mut deque = wrapped_deque(size);
                    deque.replace_all(|value| value.wrapping_mul(2_654_435_761) % 1000);
                    deque
                },
                |mut deque| {
                    deque.sort();
                    deque
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || {
                    let mut deque = wrapped_vec_deque(size);
                    deque.iter_mut().for_each(|value| *value = value.wrapping_mul(2_654_435_761) % 1000);
                    deque
                },
                |mut deque| {
                    deque.make_contiguous().sort();
                    deque
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_push,
    benchmark_get,
    benchmark_insert_remove,
    benchmark_remove_where,
    benchmark_sort
);
criterion_main!(benches);
