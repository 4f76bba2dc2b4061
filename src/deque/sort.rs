//! Stable in-place sorting.
//!
//! A contiguous live range is sorted directly. A wrapped range is first
//! gathered into one contiguous run: into the free gap after `tail` when it
//! is large enough, otherwise into a temporary vector. Both gatherings are
//! undone by a guard, so the deque stays consistent if the comparator panics.

use std::cmp::Ordering;

use super::IndexableDeque;
use super::ring::{advance, distance_from, move_slots};

impl<T> IndexableDeque<T> {
    /// Sorts the elements with `compare`, keeping equal elements in their
    /// original order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexable_deque::IndexableDeque;
    ///
    /// let mut deque: IndexableDeque<(u8, char)> =
    ///     [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')].into();
    /// deque.sort_by(|left, right| left.0.cmp(&right.0));
    /// assert_eq!(deque.to_vec(), vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = self.len();
        if len < 2 {
            return;
        }
        if !self.is_wrapped() {
            self.slots[self.head..self.tail].sort_by(by_element(&mut compare));
        } else if self.tail == 0 {
            self.slots[self.head..].sort_by(by_element(&mut compare));
        } else if self.tail + len <= self.head {
            let staged = Staged::new(self);
            let (start, end) = staged.range();
            staged.deque.slots[start..end].sort_by(by_element(&mut compare));
        } else {
            let mut linear = Linearized::new(self);
            linear.elements.sort_by(&mut compare);
        }
    }

    /// Sorts the elements by their natural order.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp);
    }

    /// Sorts the elements by the key `extract` returns for each of them.
    pub fn sort_by_key<K, F>(&mut self, mut extract: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.sort_by(|left, right| extract(left).cmp(&extract(right)));
    }
}

/// Orders slots by their elements; empty slots sort last.
fn by_element<T, F>(compare: &mut F) -> impl FnMut(&Option<T>, &Option<T>) -> Ordering + '_
where
    F: FnMut(&T, &T) -> Ordering,
{
    move |left: &Option<T>, right: &Option<T>| match (left, right) {
        (Some(left), Some(right)) => compare(left, right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Moves a wrapped live range into the free gap `[tail, tail + len)` and
/// moves it back on drop.
///
/// Requires `tail + len <= head`, so the gap never overlaps either leg.
struct Staged<'a, T> {
    deque: &'a mut IndexableDeque<T>,
    leading: usize,
}

impl<'a, T> Staged<'a, T> {
    fn new(deque: &'a mut IndexableDeque<T>) -> Self {
        let modulus = deque.slots.len();
        let (head, tail) = (deque.head, deque.tail);
        let leading = modulus - head;
        // wrapped leg first, so the leading leg never lands on itself
        move_slots(&mut deque.slots, 0, tail + leading, tail);
        move_slots(&mut deque.slots, head, tail, leading);
        Self { deque, leading }
    }

    /// Physical range the elements occupy while staged.
    fn range(&self) -> (usize, usize) {
        let start = self.deque.tail;
        (start, start + distance_from(self.deque.tail, self.deque.head, self.deque.slots.len()))
    }
}

impl<T> Drop for Staged<'_, T> {
    fn drop(&mut self) {
        let deque = &mut *self.deque;
        let (head, tail) = (deque.head, deque.tail);
        move_slots(&mut deque.slots, tail, head, self.leading);
        move_slots(&mut deque.slots, tail + self.leading, 0, tail);
    }
}

/// Takes the elements out into a vector and writes them back on drop.
struct Linearized<'a, T> {
    deque: &'a mut IndexableDeque<T>,
    elements: Vec<T>,
}

impl<'a, T> Linearized<'a, T> {
    fn new(deque: &'a mut IndexableDeque<T>) -> Self {
        let mut elements = Vec::with_capacity(deque.len());
        let (head, tail) = (deque.head, deque.tail);
        elements.extend(deque.slots[head..].iter_mut().filter_map(Option::take));
        elements.extend(deque.slots[..tail].iter_mut().filter_map(Option::take));
        Self { deque, elements }
    }
}

impl<T> Drop for Linearized<'_, T> {
    fn drop(&mut self) {
        let modulus = self.deque.slots.len();
        let mut position = self.deque.head;
        for element in self.elements.drain(..) {
            self.deque.slots[position] = Some(element);
            position = advance(position, modulus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Builds a deque whose live range starts at `head` in a buffer of
    /// `slots` slots.
    fn positioned(values: &[i32], head: usize, slots: usize) -> IndexableDeque<i32> {
        let mut deque = IndexableDeque::with_capacity(slots - 1);
        for _ in 0..head {
            deque.push_back(0);
            deque.pop_front();
        }
        for &value in values {
            deque.push_back(value);
        }
        assert_eq!(deque.slot_count(), slots);
        deque
    }

    #[rstest]
    fn test_sort_contiguous() {
        let mut deque = positioned(&[3, 1, 2], 1, 8);
        deque.sort();
        assert_eq!(deque.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_sort_wrapped_ending_at_buffer_end() {
        let mut deque = positioned(&[3, 1, 2], 5, 8);
        assert_eq!(deque.tail(), 0);
        deque.sort();
        assert_eq!(deque.to_vec(), vec![1, 2, 3]);
        assert!(deque.invariants_hold());
    }

    #[rstest]
    fn test_sort_wrapped_through_gap() {
        // the free gap [1, 7) can hold all four elements
        let mut deque = positioned(&[5, 4, 3, 2], 7, 10);
        assert_eq!((deque.head(), deque.tail()), (7, 1));
        deque.sort();
        assert_eq!(deque.to_vec(), vec![2, 3, 4, 5]);
        assert_eq!((deque.head(), deque.tail()), (7, 1));
        assert!(deque.invariants_hold());
    }

    #[rstest]
    fn test_sort_wrapped_through_vector() {
        let mut deque = positioned(&[5, 4, 3, 2, 1], 3, 6);
        assert!(deque.is_wrapped());
        deque.sort();
        assert_eq!(deque.to_vec(), vec![1, 2, 3, 4, 5]);
        assert!(deque.invariants_hold());
    }

    #[rstest]
    #[case::contiguous(1, 10)]
    #[case::staged(7, 10)]
    #[case::linearized(3, 6)]
    fn test_sort_is_stable(#[case] head: usize, #[case] slots: usize) {
        let values = [21, 10, 22, 11, 23];
        let mut deque = positioned(&values, head, slots);
        deque.sort_by_key(|value| value / 10);
        assert_eq!(deque.to_vec(), vec![10, 11, 21, 22, 23]);
    }

    #[rstest]
    #[case::staged(&[5, 4, 3, 2], 7, 10)]
    #[case::linearized(&[5, 4, 3, 2, 1], 3, 6)]
    fn test_panicking_comparator_keeps_deque_consistent(
        #[case] values: &[i32],
        #[case] head: usize,
        #[case] slots: usize,
    ) {
        let mut deque = positioned(values, head, slots);
        let mut calls = 0;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            deque.sort_by(|left, right| {
                calls += 1;
                assert!(calls < 3, "comparator failed");
                left.cmp(right)
            });
        }));
        assert!(result.is_err());
        assert_eq!(deque.len(), values.len());
        assert_eq!((deque.head(), deque.tail()), (head, (head + values.len()) % slots));
        assert!(deque.invariants_hold());
        let mut remaining = deque.to_vec();
        remaining.sort_unstable();
        let mut expected = values.to_vec();
        expected.sort_unstable();
        assert_eq!(remaining, expected);
    }
}
