//! Growable circular-buffer deque with constant-time positional access.
//!
//! This module provides [`IndexableDeque`], a double-ended queue backed by a
//! single contiguous buffer addressed with wrap-around arithmetic.
//!
//! # Overview
//!
//! `IndexableDeque` behaves both like a deque and like a random-access list:
//!
//! - O(1) `get`, `set` by position
//! - O(1) amortized `push_front`, `push_back`, O(1) `pop_front`, `pop_back`
//! - O(min(i, n - i)) `insert` and `remove_at` at position i
//! - O(n) bulk removal (`remove_where`), O(n log n) stable sort
//!
//! # Layout
//!
//! ```text
//!  wrapped (head > tail)            contiguous (head <= tail)
//!  ┌───┬───┬───┬───┬───┬───┐        ┌───┬───┬───┬───┬───┬───┐
//!  │ d │ e │ · │ · │ b │ c │        │ · │ a │ b │ c │ · │ · │
//!  └───┴───┴───┴───┴───┴───┘        └───┴───┴───┴───┴───┴───┘
//!            ▲       ▲                    ▲           ▲
//!          tail    head                 head        tail
//! ```
//!
//! The live elements occupy the circular range `[head, tail)`. The slot at
//! `tail` is always empty, so `head == tail` means "empty" and the buffer
//! always has at least one more slot than the deque has elements.
//!
//! # Examples
//!
//! ```rust
//! use indexable_deque::IndexableDeque;
//!
//! let mut deque = IndexableDeque::with_capacity(4);
//! deque.push_back(2);
//! deque.push_back(3);
//! deque.push_front(1);
//!
//! assert_eq!(deque.get(0), Some(&1));
//! assert_eq!(deque.get(2), Some(&3));
//! assert_eq!(deque.pop_front(), Some(1));
//! assert_eq!(deque.get(0), Some(&2));
//! ```

mod bulk;
mod cursor;
mod iter;
#[cfg(feature = "rayon")]
mod parallel;
mod ring;
mod sort;
mod spliter;
mod traits;

pub use cursor::{DequeCursor, Direction, ListCursor};
pub use iter::{IntoIter, Iter, IterMut};
#[cfg(feature = "rayon")]
pub use parallel::ParIter;
pub use spliter::{Characteristics, Spliter};

use rand::Rng;

use crate::config::DequeConfig;
use crate::error::DequeError;
use ring::{advance, advance_by, distance_from, legs, retreat};

/// Number of elements a deque created without a capacity hint can hold
/// before its first reallocation.
pub const DEFAULT_CAPACITY: usize = 16;

/// Describes which side of the buffer moved when an element was inserted at
/// an arbitrary position.
///
/// Cursors use this to resynchronize their cached positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shift {
    /// The buffer was replaced; the live range now starts at slot 0.
    Reallocated,
    /// The front segment moved and `head` changed.
    Head,
    /// The back segment moved and `tail` changed.
    Tail,
}

/// Describes which side of the live range slid over a deleted slot.
///
/// Deletion never reallocates, so unlike [`Shift`] there is no third case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closed {
    /// The front segment moved back and `head` advanced.
    Head,
    /// The back segment moved forward and `tail` retreated.
    Tail,
}

/// A resizable double-ended queue with constant-time positional access.
///
/// See the [module documentation](self) for the buffer layout.
///
/// # Examples
///
/// ```rust
/// use indexable_deque::IndexableDeque;
///
/// let mut deque: IndexableDeque<i32> = (1..=5).collect();
/// deque.insert(2, 10).unwrap();
/// assert_eq!(deque.to_vec(), vec![1, 2, 10, 3, 4, 5]);
///
/// assert!(deque.remove_where(|value| value % 2 == 0));
/// assert_eq!(deque.to_string(), "[1, 3, 5]");
/// ```
#[derive(Clone)]
pub struct IndexableDeque<T> {
    /// Every slot outside `[head, tail)` is `None`; `slots.len() >= 1`.
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
}

impl<T> IndexableDeque<T> {
    /// Creates an empty deque able to hold [`DEFAULT_CAPACITY`] elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexable_deque::IndexableDeque;
    ///
    /// let deque: IndexableDeque<String> = IndexableDeque::new();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), 16);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty deque with room for at least `capacity` elements.
    ///
    /// A hint of zero still allocates one (always empty) slot.
    ///
    /// # Panics
    ///
    /// Panics if the buffer for `capacity` elements cannot be allocated.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let slot_count = capacity.saturating_add(1).min(Self::max_slots());
        let mut slots = Vec::with_capacity(slot_count);
        slots.resize_with(slot_count, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
        }
    }

    /// Creates an empty deque from the given configuration.
    #[must_use]
    pub fn from_config(config: DequeConfig) -> Self {
        Self::with_capacity(config.capacity_hint())
    }

    /// Builds a deque from a source that may contain missing elements.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NullElement`] with the position of the first
    /// `None` in `source`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexable_deque::{DequeError, IndexableDeque};
    ///
    /// let deque = IndexableDeque::try_from_options([Some(1), Some(2)]).unwrap();
    /// assert_eq!(deque.to_vec(), vec![1, 2]);
    ///
    /// let error = IndexableDeque::try_from_options([Some(1), None]).unwrap_err();
    /// assert_eq!(error, DequeError::NullElement { index: 1 });
    /// ```
    pub fn try_from_options<I>(source: I) -> Result<Self, DequeError>
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let elements = collect_non_null(source)?;
        let mut deque = Self::with_capacity(elements.len());
        deque.try_add_all(elements)?;
        Ok(deque)
    }

    /// Returns `false`: operations on this deque are serialized by `&mut`
    /// borrows rather than by a lock.
    ///
    /// See [`SharedDeque`](crate::sync::SharedDeque) for the synced variant.
    #[inline]
    pub const fn is_synced(&self) -> bool {
        false
    }

    /// Observes the calling thread's interruption flag without locking.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the calling thread has been
    /// interrupted. The flag stays set.
    #[cfg(feature = "sync")]
    pub fn lock_interruptibly(&self) -> Result<(), DequeError> {
        crate::sync::NoopLock.lock_interruptibly()
    }

    // =========================================================================
    // Size and capacity
    // =========================================================================

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        distance_from(self.tail, self.head, self.slots.len())
    }

    /// Returns `true` if the deque holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns the number of elements the deque can hold without
    /// reallocating.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns `true` if the live range currently crosses the end of the
    /// buffer.
    #[inline]
    pub const fn is_wrapped(&self) -> bool {
        self.head > self.tail
    }

    /// Ensures the deque can hold at least `min_capacity` elements without
    /// reallocating.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::CapacityOverflow`] if the buffer cannot be
    /// enlarged; the deque is left unchanged.
    pub fn ensure_capacity(&mut self, min_capacity: usize) -> Result<(), DequeError> {
        let slot_count = min_capacity
            .checked_add(1)
            .ok_or(DequeError::CapacityOverflow {
                requested: min_capacity,
            })?;
        if slot_count > self.slots.len() {
            self.grow(slot_count - self.slots.len())?;
        }
        Ok(())
    }

    /// Shrinks the buffer to the smallest size that holds the current
    /// elements.
    ///
    /// The live range is laid out from slot 0 afterwards. Calling this twice
    /// in a row leaves the capacity unchanged the second time. If the smaller
    /// buffer cannot be allocated the deque is left as it was; use
    /// [`try_trim_to_size`](Self::try_trim_to_size) to observe that case.
    pub fn trim_to_size(&mut self) {
        if let Err(error) = self.try_trim_to_size() {
            tracing::trace!(%error, "trim skipped");
        }
    }

    /// Shrinks the buffer like [`trim_to_size`](Self::trim_to_size),
    /// reporting allocation failure.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::CapacityOverflow`] if the smaller buffer could
    /// not be allocated; the deque is unchanged.
    pub fn try_trim_to_size(&mut self) -> Result<(), DequeError> {
        let len = self.len();
        if len + 1 < self.slots.len() {
            let previous = self.slots.len();
            self.relayout(len + 1, len, std::iter::empty())?;
            tracing::trace!(from = previous, to = len + 1, "deque trimmed");
        }
        Ok(())
    }

    // =========================================================================
    // Deque operations
    // =========================================================================

    /// Inserts `element` at the front.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed the maximum allocatable size.
    pub fn push_front(&mut self, element: T) {
        if let Err(error) = self.try_push_front(element) {
            capacity_overflow(error);
        }
    }

    /// Inserts `element` at the back.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed the maximum allocatable size.
    pub fn push_back(&mut self, element: T) {
        if let Err(error) = self.try_push_back(element) {
            capacity_overflow(error);
        }
    }

    /// Inserts `element` at the front, reporting growth failure instead of
    /// panicking.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::CapacityOverflow`] if the buffer had to grow and
    /// could not; `element` is dropped and the deque is unchanged.
    pub fn try_push_front(&mut self, element: T) -> Result<(), DequeError> {
        let modulus = self.slots.len();
        self.head = retreat(self.head, modulus);
        self.slots[self.head] = Some(element);
        if self.head == self.tail
            && let Err(error) = self.grow(1)
        {
            self.slots[self.head] = None;
            self.head = advance(self.head, modulus);
            return Err(error);
        }
        Ok(())
    }

    /// Inserts `element` at the back, reporting growth failure instead of
    /// panicking.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::CapacityOverflow`] if the buffer had to grow and
    /// could not; `element` is dropped and the deque is unchanged.
    pub fn try_push_back(&mut self, element: T) -> Result<(), DequeError> {
        let modulus = self.slots.len();
        self.slots[self.tail] = Some(element);
        self.tail = advance(self.tail, modulus);
        if self.head == self.tail
            && let Err(error) = self.grow(1)
        {
            self.tail = retreat(self.tail, modulus);
            self.slots[self.tail] = None;
            return Err(error);
        }
        Ok(())
    }

    /// Inserts `element` at the front. Always returns `true`.
    pub fn offer_first(&mut self, element: T) -> bool {
        self.push_front(element);
        true
    }

    /// Inserts `element` at the back. Always returns `true`.
    pub fn offer_last(&mut self, element: T) -> bool {
        self.push_back(element);
        true
    }

    /// Pushes `element` onto the stack represented by this deque, i.e. at the
    /// front.
    pub fn push(&mut self, element: T) {
        self.push_front(element);
    }

    /// Removes and returns the front element, or `None` if empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let element = self.slots[self.head].take()?;
        self.head = advance(self.head, self.slots.len());
        Some(element)
    }

    /// Removes and returns the back element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let last = retreat(self.tail, self.slots.len());
        let element = self.slots[last].take()?;
        self.tail = last;
        Some(element)
    }

    /// Same as [`pop_front`](Self::pop_front).
    pub fn poll(&mut self) -> Option<T> {
        self.pop_front()
    }

    /// Removes and returns the front element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty.
    pub fn remove_first(&mut self) -> Result<T, DequeError> {
        self.pop_front().ok_or(DequeError::NoSuchElement)
    }

    /// Removes and returns the back element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty.
    pub fn remove_last(&mut self) -> Result<T, DequeError> {
        self.pop_back().ok_or(DequeError::NoSuchElement)
    }

    /// Pops the top of the stack represented by this deque.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty.
    pub fn pop(&mut self) -> Result<T, DequeError> {
        self.remove_first()
    }

    /// Returns the front element, or `None` if empty.
    #[inline]
    pub fn peek_front(&self) -> Option<&T> {
        self.slots[self.head].as_ref()
    }

    /// Returns the back element, or `None` if empty.
    #[inline]
    pub fn peek_back(&self) -> Option<&T> {
        self.slots[retreat(self.tail, self.slots.len())].as_ref()
    }

    /// Returns a mutable reference to the front element.
    #[inline]
    pub fn peek_front_mut(&mut self) -> Option<&mut T> {
        self.slots[self.head].as_mut()
    }

    /// Returns a mutable reference to the back element.
    #[inline]
    pub fn peek_back_mut(&mut self) -> Option<&mut T> {
        let last = retreat(self.tail, self.slots.len());
        self.slots[last].as_mut()
    }

    /// Same as [`peek_front`](Self::peek_front).
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.peek_front()
    }

    /// Returns the front element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty.
    pub fn get_first(&self) -> Result<&T, DequeError> {
        self.peek_front().ok_or(DequeError::NoSuchElement)
    }

    /// Returns the back element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty.
    pub fn get_last(&self) -> Result<&T, DequeError> {
        self.peek_back().ok_or(DequeError::NoSuchElement)
    }

    /// Same as [`get_first`](Self::get_first).
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty.
    pub fn element(&self) -> Result<&T, DequeError> {
        self.get_first()
    }

    // =========================================================================
    // Positional operations
    // =========================================================================

    /// Returns the element at logical position `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            self.slots[self.physical(index)].as_ref()
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at logical position `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            let position = self.physical(index);
            self.slots[position].as_mut()
        } else {
            None
        }
    }

    /// Returns the element at logical position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] if `index >= len()`.
    pub fn try_get(&self, index: usize) -> Result<&T, DequeError> {
        self.check_index(index)?;
        self.get(index).ok_or(DequeError::ConcurrentModification)
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] if `index >= len()`.
    pub fn set(&mut self, index: usize, element: T) -> Result<T, DequeError> {
        self.check_index(index)?;
        let position = self.physical(index);
        self.slots[position]
            .replace(element)
            .ok_or(DequeError::ConcurrentModification)
    }

    /// Inserts `element` at `index`, shifting whichever side of the deque is
    /// shorter.
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
    /// let mut deque: IndexableDeque<char> = "acd".chars().collect();
    /// deque.insert(1, 'b').unwrap();
    /// deque.insert(4, 'e').unwrap();
    /// assert_eq!(deque.to_vec(), vec!['a', 'b', 'c', 'd', 'e']);
    /// assert!(deque.insert(9, 'z').is_err());
    /// ```
    pub fn insert(&mut self, index: usize, element: T) -> Result<(), DequeError> {
        let len = self.len();
        if index > len {
            return Err(DequeError::IndexOutOfBounds { index, len });
        }
        let position = self.physical(index);
        self.insert_physical(position, element).map(|_| ())
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, DequeError> {
        self.check_index(index)?;
        let position = self.physical(index);
        self.delete(position)
            .map(|(element, _)| element)
            .ok_or(DequeError::ConcurrentModification)
    }

    /// Removes and returns a uniformly chosen element, or `None` if empty.
    pub fn remove_at_random(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let index = rand::rng().random_range(0..len);
        self.remove_at(index).ok()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find_physical(value).is_some()
    }

    /// Returns `true` if every element of `values` is contained.
    pub fn contains_all<'a, I>(&self, values: I) -> bool
    where
        T: PartialEq + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        values.into_iter().all(|value| self.contains(value))
    }

    /// Returns the logical position of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find_physical(value)
            .map(|position| distance_from(position, self.head, self.slots.len()))
    }

    /// Returns the logical position of the last element equal to `value`.
    pub fn last_index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.rfind_physical(value)
            .map(|position| distance_from(position, self.head, self.slots.len()))
    }

    /// Removes the first element equal to `value`, scanning front to back.
    pub fn remove_first_occurrence(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.find_physical(value) {
            Some(position) => self.delete(position).is_some(),
            None => false,
        }
    }

    /// Removes the last element equal to `value`, scanning back to front.
    pub fn remove_last_occurrence(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.rfind_physical(value) {
            Some(position) => self.delete(position).is_some(),
            None => false,
        }
    }

    /// Same as [`remove_first_occurrence`](Self::remove_first_occurrence).
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.remove_first_occurrence(value)
    }

    // =========================================================================
    // Whole-deque operations
    // =========================================================================

    /// Removes every element. The buffer keeps its size.
    pub fn clear(&mut self) {
        ring::clear_range(&mut self.slots, self.head, self.tail);
        self.head = 0;
        self.tail = 0;
    }

    /// Calls `action` on each element, front to back.
    pub fn for_each<F>(&self, action: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(action);
    }

    /// Replaces each element with the result of `operator` applied to it.
    pub fn replace_all<F>(&mut self, mut operator: F)
    where
        F: FnMut(&T) -> T,
    {
        for element in self.iter_mut() {
            *element = operator(element);
        }
    }

    /// Returns the elements front to back in a new vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Same as [`to_vec`](Self::to_vec).
    pub fn to_list(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.to_vec()
    }

    /// Returns an order-dependent hash of the elements.
    ///
    /// Accumulates `h = 31 * h + hash(element)` starting from 1, hashing each
    /// element with `FxHasher`, so equal sequences hash equally across
    /// deques and runs.
    pub fn sequence_hash(&self) -> u64
    where
        T: std::hash::Hash,
    {
        use std::hash::{BuildHasher, BuildHasherDefault};
        let builder = BuildHasherDefault::<rustc_hash::FxHasher>::default();
        self.iter().fold(1_u64, |hash, element| {
            hash.wrapping_mul(31)
                .wrapping_add(builder.hash_one(element))
        })
    }

    /// Checks the structural invariants of the buffer.
    ///
    /// Intended for tests and debugging; every public operation preserves
    /// these invariants.
    pub fn invariants_hold(&self) -> bool {
        let modulus = self.slots.len();
        if modulus == 0 || self.head >= modulus || self.tail >= modulus {
            return false;
        }
        if self.len() >= modulus || self.slots[self.tail].is_some() {
            return false;
        }
        self.slots.iter().enumerate().all(|(position, slot)| {
            let live = distance_from(position, self.head, modulus) < self.len();
            live == slot.is_some()
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    const fn max_slots() -> usize {
        let slot_size = std::mem::size_of::<Option<T>>();
        isize::MAX.unsigned_abs() / if slot_size == 0 { 1 } else { slot_size }
    }

    #[inline]
    const fn physical(&self, index: usize) -> usize {
        advance_by(self.head, index, self.slots.len())
    }

    #[inline]
    const fn check_index(&self, index: usize) -> Result<(), DequeError> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            Err(DequeError::IndexOutOfBounds { index, len })
        }
    }

    /// Returns how many slots to add on the next reallocation: double small
    /// buffers, grow large ones by half.
    const fn jump(&self) -> usize {
        let slot_count = self.slots.len();
        if slot_count < 64 {
            slot_count + 2
        } else {
            slot_count >> 1
        }
    }

    /// Computes the slot count after adding at least `needed` slots.
    fn new_slot_count(&self, needed: usize) -> Result<usize, DequeError> {
        let slot_count = self.slots.len();
        let max = Self::max_slots();
        let minimum = slot_count
            .checked_add(needed)
            .filter(|&minimum| minimum <= max)
            .ok_or(DequeError::CapacityOverflow {
                requested: slot_count.saturating_add(needed),
            })?;
        let jump = self.jump();
        if needed > jump {
            Ok(minimum)
        } else {
            Ok(slot_count.saturating_add(jump).min(max))
        }
    }

    /// Adds at least `needed` slots, keeping the logical order.
    ///
    /// If the live range wraps, the leg running up to the old end of the
    /// buffer slides to the new end; `tail` never moves.
    fn grow(&mut self, needed: usize) -> Result<(), DequeError> {
        let old_slot_count = self.slots.len();
        let new_slot_count = self.new_slot_count(needed)?;
        self.slots
            .try_reserve_exact(new_slot_count - old_slot_count)
            .map_err(|_| DequeError::CapacityOverflow {
                requested: new_slot_count,
            })?;
        self.slots.resize_with(new_slot_count, || None);
        // head == tail is ambiguous here: the caller may have just filled the last slot
        if self.tail < self.head || (self.tail == self.head && self.slots[self.head].is_some()) {
            let added = new_slot_count - old_slot_count;
            ring::shift_toward_back(
                &mut self.slots,
                self.head,
                old_slot_count - self.head,
                added,
            );
            self.head += added;
        }
        tracing::trace!(from = old_slot_count, to = new_slot_count, "deque grown");
        Ok(())
    }

    /// Moves the live elements into a fresh buffer of `slot_count` slots,
    /// placing `inserted` at logical position `position`.
    ///
    /// The new buffer is allocated before anything moves, so on failure the
    /// deque is untouched.
    fn relayout<I>(&mut self, slot_count: usize, position: usize, inserted: I) -> Result<(), DequeError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(slot_count)
            .map_err(|_| DequeError::CapacityOverflow {
                requested: slot_count,
            })?;
        {
            let (wrapped, leading) = self.slots.split_at_mut(self.head);
            let mut live = leading
                .iter_mut()
                .chain(wrapped.iter_mut())
                .filter_map(Option::take);
            slots.extend(live.by_ref().take(position).map(Some));
            slots.extend(inserted.into_iter().map(Some));
            slots.extend(live.map(Some));
        }
        let len = slots.len();
        slots.resize_with(slot_count.max(len + 1), || None);
        self.slots = slots;
        self.head = 0;
        self.tail = len;
        Ok(())
    }

    /// Inserts `element` so that it ends up immediately before physical slot
    /// `position` (which may be `tail`).
    pub(crate) fn insert_physical(&mut self, position: usize, element: T) -> Result<Shift, DequeError> {
        let modulus = self.slots.len();
        let front = distance_from(position, self.head, modulus);
        let back = distance_from(self.tail, position, modulus);

        if front + back + 1 == modulus {
            // Last free slot: grow and insert in one pass
            let slot_count = self.new_slot_count(1)?;
            self.relayout(slot_count, front, std::iter::once(element))?;
            tracing::trace!(from = modulus, to = slot_count, "deque grown on insert");
            return Ok(Shift::Reallocated);
        }
        if front < back {
            ring::shift_toward_front(&mut self.slots, self.head, front, 1);
            self.head = retreat(self.head, modulus);
            self.slots[retreat(position, modulus)] = Some(element);
            Ok(Shift::Head)
        } else {
            ring::shift_toward_back(&mut self.slots, position, back, 1);
            self.slots[position] = Some(element);
            self.tail = advance(self.tail, modulus);
            Ok(Shift::Tail)
        }
    }

    /// Removes the element at physical slot `position`, sliding whichever
    /// side is shorter over the gap.
    ///
    /// Returns `None` if the slot is outside the buffer or empty.
    pub(crate) fn delete(&mut self, position: usize) -> Option<(T, Closed)> {
        let element = self.slots.get_mut(position)?.take()?;
        let modulus = self.slots.len();
        let front = distance_from(position, self.head, modulus);
        let back = distance_from(self.tail, position, modulus) - 1;
        if front < back {
            ring::shift_toward_back(&mut self.slots, self.head, front, 1);
            self.head = advance(self.head, modulus);
            Some((element, Closed::Head))
        } else {
            ring::shift_toward_front(&mut self.slots, advance(position, modulus), back, 1);
            self.tail = retreat(self.tail, modulus);
            Some((element, Closed::Tail))
        }
    }

    fn find_physical(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let (first, second) = legs(self.head, self.tail, self.slots.len());
        first
            .chain(second)
            .find(|&position| self.slots[position].as_ref() == Some(value))
    }

    fn rfind_physical(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let (first, second) = legs(self.head, self.tail, self.slots.len());
        second
            .rev()
            .chain(first.rev())
            .find(|&position| self.slots[position].as_ref() == Some(value))
    }

    #[inline]
    pub(crate) const fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub(crate) const fn tail(&self) -> usize {
        self.tail
    }

    #[inline]
    pub(crate) const fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn slot(&self, position: usize) -> Option<&T> {
        self.slots.get(position).and_then(Option::as_ref)
    }

    /// Overwrites a live slot, returning its previous element.
    #[inline]
    pub(crate) fn replace_slot(&mut self, position: usize, element: T) -> Option<T> {
        let slot = self.slots.get_mut(position)?;
        if slot.is_some() { slot.replace(element) } else { None }
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Option<T>] {
        &self.slots
    }
}

impl<T> Default for IndexableDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_non_null<T, I>(source: I) -> Result<Vec<T>, DequeError>
where
    I: IntoIterator<Item = Option<T>>,
{
    source
        .into_iter()
        .enumerate()
        .map(|(index, element)| element.ok_or(DequeError::NullElement { index }))
        .collect()
}

#[cold]
#[track_caller]
fn capacity_overflow(error: DequeError) -> ! {
    panic!("{error}")
}
