//! Parallel iteration with rayon.
//!
//! The producer splits the live range with the same circular arithmetic the
//! sequential iterator uses, so each worker walks a contiguous logical run.

use rayon::iter::plumbing::{Consumer, Producer, ProducerCallback, UnindexedConsumer, bridge};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use super::IndexableDeque;
use super::iter::Iter;

/// A parallel iterator over references to the elements of an
/// [`IndexableDeque`].
///
/// Obtained through `par_iter()` with `rayon::prelude` in scope.
///
/// # Examples
///
/// ```rust
/// use indexable_deque::IndexableDeque;
/// use rayon::prelude::*;
///
/// let deque: IndexableDeque<u64> = (1..=100).collect();
/// assert_eq!(deque.par_iter().sum::<u64>(), 5050);
/// ```
#[derive(Debug)]
pub struct ParIter<'a, T> {
    iter: Iter<'a, T>,
}

impl<'a, T: Sync> ParallelIterator for ParIter<'a, T> {
    type Item = &'a T;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

impl<T: Sync> IndexedParallelIterator for ParIter<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }

    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: Consumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: ProducerCallback<Self::Item>,
    {
        callback.callback(RangeProducer { iter: self.iter })
    }
}

struct RangeProducer<'a, T> {
    iter: Iter<'a, T>,
}

impl<'a, T: Sync> Producer for RangeProducer<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter
    }

    fn split_at(self, index: usize) -> (Self, Self) {
        let (left, right) = self.iter.split_at(index);
        (Self { iter: left }, Self { iter: right })
    }
}

impl<'a, T: Sync> IntoParallelIterator for &'a IndexableDeque<T> {
    type Iter = ParIter<'a, T>;
    type Item = &'a T;

    fn into_par_iter(self) -> Self::Iter {
        ParIter { iter: self.iter() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use rstest::rstest;

    #[rstest]
    fn test_par_iter_preserves_order_across_wrap() {
        let mut deque: IndexableDeque<usize> = IndexableDeque::with_capacity(1000);
        for value in 0..600 {
            deque.push_back(value);
        }
        for _ in 0..500 {
            deque.pop_front();
        }
        deque.add_all(600..1400);
        let collected: Vec<usize> = deque.par_iter().map(|value| value * 2).collect();
        let expected: Vec<usize> = (500..1400).map(|value| value * 2).collect();
        assert_eq!(collected, expected);
    }

    #[rstest]
    fn test_par_iter_len() {
        let deque: IndexableDeque<i32> = (0..10).collect();
        assert_eq!(deque.par_iter().len(), 10);
    }
}
