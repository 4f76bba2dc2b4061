//! Bulk insertion and filter-based removal.
//!
//! Bulk insertion moves the existing elements once, however many elements
//! arrive. Removal runs in two phases: `plan_removal` scans
//! with shared access and records the doomed positions in a bitset, and
//! `expunge` compacts the survivors. Splitting the phases
//! lets the synced deque evaluate the predicate while other readers on the
//! same thread still see the deque.

use smallvec::SmallVec;

use super::IndexableDeque;
use super::ring::{advance, advance_by, retreat_by};
use crate::error::DequeError;

const WORD_BITS: usize = u64::BITS as usize;

/// The outcome of scanning a deque with a removal predicate.
///
/// Records the live range the scan saw, so that compaction can refuse to run
/// against a deque that changed in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RemovalPlan {
    head: usize,
    tail: usize,
    /// Logical index of the first element to remove.
    begin: usize,
    /// Bit `i` marks logical index `begin + i` for removal.
    dead: SmallVec<[u64; 4]>,
}

impl RemovalPlan {
    fn is_dead(&self, offset: usize) -> bool {
        self.dead[offset / WORD_BITS] & (1 << (offset % WORD_BITS)) != 0
    }

    pub(crate) fn removed_count(&self) -> usize {
        self.dead.iter().map(|word| word.count_ones() as usize).sum()
    }
}

impl<T> IndexableDeque<T> {
    // =========================================================================
    // Bulk insertion
    // =========================================================================

    /// Appends every element of `elements` at the back, in order.
    ///
    /// Returns `true` if anything was added.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed the maximum allocatable size.
    pub fn add_all<I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        match self.try_add_all(elements) {
            Ok(changed) => changed,
            Err(error) => super::capacity_overflow(error),
        }
    }

    /// Appends every element of `elements` at the back, in order.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::CapacityOverflow`] if the buffer could not grow;
    /// nothing is added in that case.
    pub fn try_add_all<I>(&mut self, elements: I) -> Result<bool, DequeError>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        self.insert_range(len, elements.into_iter().collect())
    }

    /// Inserts every element of `elements` starting at `index`, keeping their
    /// order.
    ///
    /// Equivalent to inserting them one by one at `index`, `index + 1`, ...,
    /// but each existing element moves at most once.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] if `index > len()`, or
    /// [`DequeError::CapacityOverflow`] if the buffer could not grow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexable_deque::IndexableDeque;
    ///
    /// let mut deque: IndexableDeque<i32> = [1, 5].into();
    /// assert_eq!(deque.insert_all(1, [2, 3, 4]), Ok(true));
    /// assert_eq!(deque.to_vec(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_all<I>(&mut self, index: usize, elements: I) -> Result<bool, DequeError>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        if index > len {
            return Err(DequeError::IndexOutOfBounds { index, len });
        }
        self.insert_range(index, elements.into_iter().collect())
    }

    /// Opens a gap of `elements.len()` slots at logical `index` and fills it.
    ///
    /// The shorter side moves; if the buffer is too small the elements are
    /// laid out into a new buffer in one pass instead.
    fn insert_range(&mut self, index: usize, elements: Vec<T>) -> Result<bool, DequeError> {
        let count = elements.len();
        if count == 0 {
            return Ok(false);
        }
        let len = self.len();
        let modulus = self.slots.len();
        if len + count >= modulus {
            let slot_count = self.new_slot_count(len + count + 1 - modulus)?;
            self.relayout(slot_count, index, elements)?;
            tracing::trace!(from = modulus, to = slot_count, "deque grown on bulk insert");
            return Ok(true);
        }
        if index < len - index {
            super::ring::shift_toward_front(&mut self.slots, self.head, index, count);
            self.head = retreat_by(self.head, count, modulus);
        } else {
            let position = self.physical(index);
            super::ring::shift_toward_back(&mut self.slots, position, len - index, count);
            self.tail = advance_by(self.tail, count, modulus);
        }
        let mut position = self.physical(index);
        for element in elements {
            self.slots[position] = Some(element);
            position = advance(position, modulus);
        }
        Ok(true)
    }

    // =========================================================================
    // Filter-based removal
    // =========================================================================

    /// Removes every element for which `predicate` returns `true`, keeping
    /// the survivors in order.
    ///
    /// Returns `true` if anything was removed. A pass in which nothing
    /// matches does not allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexable_deque::IndexableDeque;
    ///
    /// let mut deque: IndexableDeque<i32> = (1..=6).collect();
    /// assert!(deque.remove_where(|value| value % 2 == 0));
    /// assert_eq!(deque.to_vec(), vec![1, 3, 5]);
    /// assert!(!deque.remove_where(|value| value % 2 == 0));
    /// ```
    pub fn remove_where<F>(&mut self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let Some(plan) = self.plan_removal(predicate) else {
            return false;
        };
        // planned under this same borrow, so the live range cannot have moved
        self.compact(&plan);
        true
    }

    /// Keeps only the elements for which `predicate` returns `true`.
    pub fn retain<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.remove_where(|element| !predicate(element))
    }

    /// Removes every element that equals one of `values`.
    pub fn remove_all(&mut self, values: &[T]) -> bool
    where
        T: PartialEq,
    {
        self.remove_where(|element| values.contains(element))
    }

    /// Removes every element that equals none of `values`.
    pub fn retain_all(&mut self, values: &[T]) -> bool
    where
        T: PartialEq,
    {
        self.remove_where(|element| !values.contains(element))
    }

    /// Scans the live range and records which elements `predicate` selects.
    ///
    /// Returns `None` without allocating if nothing matches.
    pub(crate) fn plan_removal<F>(&self, mut predicate: F) -> Option<RemovalPlan>
    where
        F: FnMut(&T) -> bool,
    {
        let begin = self.iter().position(&mut predicate)?;
        let span = self.len() - begin;
        let mut dead: SmallVec<[u64; 4]> = SmallVec::from_elem(0, span.div_ceil(WORD_BITS));
        dead[0] = 1;
        for (offset, element) in self.iter().enumerate().skip(begin + 1) {
            let offset = offset - begin;
            if predicate(element) {
                dead[offset / WORD_BITS] |= 1 << (offset % WORD_BITS);
            }
        }
        Some(RemovalPlan {
            head: self.head,
            tail: self.tail,
            begin,
            dead,
        })
    }

    /// Drops the elements `plan` marks and slides the survivors together.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] if the live range
    /// changed since the plan was made; the deque is left untouched.
    #[cfg(any(test, feature = "sync"))]
    pub(crate) fn expunge(&mut self, plan: &RemovalPlan) -> Result<(), DequeError> {
        if plan.head != self.head || plan.tail != self.tail {
            return Err(DequeError::ConcurrentModification);
        }
        self.compact(plan);
        Ok(())
    }

    /// Slides the survivors of `plan` together. The plan must match the
    /// current live range.
    fn compact(&mut self, plan: &RemovalPlan) {
        debug_assert!(plan.head == self.head && plan.tail == self.tail);
        let modulus = self.slots.len();
        let span = self.len() - plan.begin;
        let mut write = self.physical(plan.begin);
        let mut read = write;
        // [write, read) holds only empty slots
        for offset in 0..span {
            if plan.is_dead(offset) {
                self.slots[read] = None;
            } else {
                self.slots.swap(read, write);
                write = advance(write, modulus);
            }
            read = advance(read, modulus);
        }
        self.tail = write;
        tracing::trace!(removed = plan.removed_count(), "elements expunged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn wrapped(values: &[i32]) -> IndexableDeque<i32> {
        let mut deque = IndexableDeque::with_capacity(values.len() + 2);
        for _ in 0..values.len() {
            deque.push_back(0);
            deque.pop_front();
        }
        deque.add_all(values.iter().copied());
        deque
    }

    #[rstest]
    fn test_remove_where_evens() {
        let mut deque: IndexableDeque<i32> = (1..=6).collect();
        assert!(deque.remove_where(|value| value % 2 == 0));
        assert_eq!(deque.to_vec(), vec![1, 3, 5]);
        assert!(!deque.remove_where(|value| value % 2 == 0));
        assert_eq!(deque.to_vec(), vec![1, 3, 5]);
    }

    #[rstest]
    fn test_remove_where_across_wrap() {
        let mut deque = wrapped(&[1, 2, 3, 4, 5, 6]);
        assert!(deque.is_wrapped());
        assert!(deque.remove_where(|value| *value > 1 && *value < 6));
        assert_eq!(deque.to_vec(), vec![1, 6]);
        assert!(deque.invariants_hold());
    }

    #[rstest]
    fn test_remove_where_everything() {
        let mut deque = wrapped(&[1, 2, 3]);
        assert!(deque.remove_where(|_| true));
        assert!(deque.is_empty());
        assert!(deque.invariants_hold());
    }

    #[rstest]
    fn test_plan_spans_multiple_words() {
        let deque: IndexableDeque<usize> = (0..200).collect();
        let plan = deque.plan_removal(|value| value % 3 == 0).unwrap();
        assert_eq!(plan.begin, 0);
        assert_eq!(plan.dead.len(), 4);
        assert_eq!(plan.removed_count(), 67);
    }

    #[rstest]
    fn test_stale_plan_is_rejected() {
        let mut deque: IndexableDeque<i32> = (1..=4).collect();
        let plan = deque.plan_removal(|value| *value == 2).unwrap();
        deque.push_back(5);
        assert_eq!(deque.expunge(&plan), Err(DequeError::ConcurrentModification));
        assert_eq!(deque.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_retain_and_remove_all() {
        let mut deque: IndexableDeque<i32> = (1..=6).collect();
        assert!(deque.retain(|value| *value > 2));
        assert!(deque.remove_all(&[3, 9]));
        assert!(!deque.retain_all(&[4, 5, 6]));
        assert!(deque.retain_all(&[5]));
        assert_eq!(deque.to_vec(), vec![5]);
    }

    #[rstest]
    #[case::front(1)]
    #[case::middle(3)]
    #[case::back(5)]
    fn test_insert_all_without_growth(#[case] index: usize) {
        let mut deque = wrapped(&[1, 2, 3, 4, 5]);
        let slots = deque.slot_count();
        deque.insert_all(index, [10, 11]).unwrap();
        let base = [1, 2, 3, 4, 5];
        let expected = [&base[..index], &[10, 11][..], &base[index..]].concat();
        assert_eq!(deque.to_vec(), expected);
        assert_eq!(deque.slot_count(), slots);
        assert!(deque.invariants_hold());
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(4)]
    fn test_insert_all_with_growth(#[case] index: usize) {
        let mut deque = wrapped(&[1, 2, 3, 4]);
        deque.insert_all(index, 10..20).unwrap();
        let base = [1, 2, 3, 4];
        let inserted: Vec<i32> = (10..20).collect();
        let expected = [&base[..index], &inserted[..], &base[index..]].concat();
        assert_eq!(deque.to_vec(), expected);
        assert_eq!(deque.head(), 0);
        assert!(deque.invariants_hold());
    }

    #[rstest]
    fn test_insert_all_rejects_bad_index() {
        let mut deque: IndexableDeque<i32> = [1].into();
        assert_eq!(
            deque.insert_all(2, [5]),
            Err(DequeError::IndexOutOfBounds { index: 2, len: 1 })
        );
        assert_eq!(deque.insert_all(1, []), Ok(false));
    }
}
