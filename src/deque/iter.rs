//! Borrowing and owning iterators over [`IndexableDeque`].

use std::iter::FusedIterator;

use super::IndexableDeque;
use super::ring::{advance, advance_by, legs};

// =============================================================================
// Iter
// =============================================================================

/// An iterator over references to the elements of an [`IndexableDeque`],
/// front to back.
///
/// Created by [`IndexableDeque::iter`]. Reversible with [`Iterator::rev`],
/// which is how [`IndexableDeque::descending_iter`] is built.
#[derive(Debug)]
pub struct Iter<'a, T> {
    slots: &'a [Option<T>],
    front: usize,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) const fn new(slots: &'a [Option<T>], front: usize, remaining: usize) -> Self {
        Self {
            slots,
            front,
            remaining,
        }
    }

    /// Splits into the first `index` elements and the rest.
    ///
    /// Requires `index <= len`.
    #[cfg(any(test, feature = "rayon"))]
    pub(crate) fn split_at(self, index: usize) -> (Self, Self) {
        let index = index.min(self.remaining);
        let back_front = advance_by(self.front, index, self.slots.len());
        (
            Self::new(self.slots, self.front, index),
            Self::new(self.slots, back_front, self.remaining - index),
        )
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self::new(self.slots, self.front, self.remaining)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let element = self.slots[self.front].as_ref();
        self.front = advance(self.front, self.slots.len());
        self.remaining -= 1;
        element
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.remaining {
            self.front = advance_by(self.front, self.remaining, self.slots.len());
            self.remaining = 0;
            return None;
        }
        self.front = advance_by(self.front, n, self.slots.len());
        self.remaining -= n;
        self.next()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.slots[advance_by(self.front, self.remaining, self.slots.len())].as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

// =============================================================================
// IterMut
// =============================================================================

/// An iterator over mutable references to the elements of an
/// [`IndexableDeque`], front to back.
///
/// Created by [`IndexableDeque::iter_mut`].
#[derive(Debug)]
pub struct IterMut<'a, T> {
    first: std::slice::IterMut<'a, Option<T>>,
    second: std::slice::IterMut<'a, Option<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.first
            .next()
            .or_else(|| self.second.next())
            .and_then(Option::as_mut)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.first.len() + self.second.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.second
            .next_back()
            .or_else(|| self.first.next_back())
            .and_then(Option::as_mut)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning iterator over the elements of an [`IndexableDeque`].
///
/// Created by the [`IntoIterator`] implementation.
#[derive(Debug, Clone)]
pub struct IntoIter<T> {
    deque: IndexableDeque<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

// =============================================================================
// Entry points
// =============================================================================

impl<T> IndexableDeque<T> {
    /// Returns a front-to-back iterator over the elements.
    ///
    /// The iterator borrows the deque, so the deque cannot be modified while
    /// it is alive. Use [`cursor`](Self::cursor) for a traversal that can
    /// remove elements as it goes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexable_deque::IndexableDeque;
    ///
    /// let deque: IndexableDeque<i32> = (1..=3).collect();
    /// let doubled: Vec<i32> = deque.iter().map(|value| value * 2).collect();
    /// assert_eq!(doubled, vec![2, 4, 6]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.slots(), self.head(), self.len())
    }

    /// Returns a back-to-front iterator over the elements.
    pub fn descending_iter(&self) -> std::iter::Rev<Iter<'_, T>> {
        self.iter().rev()
    }

    /// Returns a front-to-back iterator that allows modifying each element.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (first, second) = legs(self.head, self.tail, self.slots.len());
        let (wrapped, leading) = self.slots.split_at_mut(first.start);
        IterMut {
            first: leading[..first.len()].iter_mut(),
            second: wrapped[second].iter_mut(),
        }
    }
}

impl<T> IntoIterator for IndexableDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

impl<'a, T> IntoIterator for &'a IndexableDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut IndexableDeque<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn wrapped() -> IndexableDeque<i32> {
        let mut deque = IndexableDeque::with_capacity(4);
        for value in [3, 4, 5] {
            deque.push_back(value);
        }
        deque.push_front(2);
        deque.push_front(1);
        deque.pop_back();
        deque
    }

    #[rstest]
    fn test_iter_follows_logical_order() {
        let deque = wrapped();
        assert!(deque.is_wrapped());
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(deque.iter().len(), 4);
    }

    #[rstest]
    fn test_iter_meets_in_the_middle() {
        let deque = wrapped();
        let mut iter = deque.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[rstest]
    fn test_iter_nth_skips_across_wrap() {
        let deque = wrapped();
        let mut iter = deque.iter();
        assert_eq!(iter.nth(2), Some(&3));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.nth(5), None);
        assert_eq!(iter.next(), None);
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(4)]
    fn test_split_at(#[case] index: usize) {
        let deque = wrapped();
        let (left, right) = deque.iter().split_at(index);
        let expected = [1, 2, 3, 4];
        assert_eq!(left.copied().collect::<Vec<_>>(), expected[..index]);
        assert_eq!(right.copied().collect::<Vec<_>>(), expected[index..]);
    }

    #[rstest]
    fn test_descending_iter() {
        let deque = wrapped();
        assert_eq!(
            deque.descending_iter().copied().collect::<Vec<_>>(),
            vec![4, 3, 2, 1]
        );
    }

    #[rstest]
    fn test_iter_mut_updates_both_legs() {
        let mut deque = wrapped();
        for value in &mut deque {
            *value *= 10;
        }
        assert_eq!(deque.to_vec(), vec![10, 20, 30, 40]);
        assert_eq!(deque.iter_mut().rev().map(|value| *value).next(), Some(40));
    }

    #[rstest]
    fn test_into_iter_both_ends() {
        let mut iter = wrapped().into_iter();
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
