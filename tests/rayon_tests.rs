#![cfg(feature = "rayon")]
//! Tests for parallel iteration over IndexableDeque.

use indexable_deque::IndexableDeque;
use rayon::prelude::*;
use rstest::rstest;

fn rotated(len: usize, rotation: usize) -> IndexableDeque<u64> {
    let mut deque = IndexableDeque::with_capacity(len + 1);
    for _ in 0..rotation {
        deque.push_back(0);
        deque.pop_front();
    }
    deque.extend(0..len as u64);
    deque
}

#[rstest]
fn test_par_iter_collects_in_order(#[values(0, 1, 500, 1000, 1001)] rotation: usize) {
    let deque = rotated(1000, rotation);
    let collected: Vec<u64> = deque.par_iter().copied().collect();
    assert_eq!(collected, (0..1000).collect::<Vec<_>>());
}

#[rstest]
fn test_par_iter_sum_and_len() {
    let deque = rotated(10_000, 7_000);
    assert_eq!(deque.par_iter().len(), 10_000);
    assert_eq!(deque.par_iter().sum::<u64>(), 49_995_000);
}

#[rstest]
fn test_par_iter_indexed_adaptors() {
    let deque = rotated(100, 60);
    let evens: Vec<(usize, u64)> = deque
        .par_iter()
        .enumerate()
        .filter(|(_, value)| **value % 2 == 0)
        .map(|(index, value)| (index, *value))
        .collect();
    assert_eq!(evens.len(), 50);
    assert!(evens.iter().all(|&(index, value)| index as u64 == value));
    assert_eq!(deque.par_iter().rev().copied().take(2).collect::<Vec<_>>(), vec![99, 98]);
}

#[rstest]
fn test_par_iter_empty() {
    let deque: IndexableDeque<u64> = IndexableDeque::new();
    assert_eq!(deque.par_iter().count(), 0);
}
