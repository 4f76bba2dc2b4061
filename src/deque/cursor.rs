//! Detached, fail-fast cursors.
//!
//! A cursor holds only positions, never a borrow. Every step takes the deque
//! explicitly, so the deque stays usable between steps and the cursor can
//! remove or insert elements through it. A cursor that outlives a structural
//! change made behind its back notices on its next step and reports
//! [`DequeError::ConcurrentModification`] instead of returning the wrong
//! element.

use super::ring::{advance, distance_from, retreat};
use super::{Closed, IndexableDeque, Shift};
use crate::error::DequeError;

/// Traversal order of a [`DequeCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Front to back.
    Forward,
    /// Back to front.
    Backward,
}

// =============================================================================
// DequeCursor
// =============================================================================

/// A one-directional cursor that can remove the element it last returned.
///
/// Created by [`IndexableDeque::cursor`] and
/// [`IndexableDeque::descending_cursor`].
///
/// # Examples
///
/// ```rust
/// use indexable_deque::IndexableDeque;
///
/// let mut deque: IndexableDeque<i32> = (1..=5).collect();
/// let mut cursor = deque.cursor();
/// while cursor.has_next() {
///     if cursor.next(&deque)? % 2 == 0 {
///         cursor.remove(&mut deque)?;
///     }
/// }
/// assert_eq!(deque.to_vec(), vec![1, 3, 5]);
/// # Ok::<(), indexable_deque::DequeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DequeCursor {
    direction: Direction,
    /// Physical slot of the element the next call to `next` returns.
    cursor: usize,
    remaining: usize,
    last: Option<usize>,
}

impl DequeCursor {
    fn new<T>(deque: &IndexableDeque<T>, direction: Direction) -> Self {
        let cursor = match direction {
            Direction::Forward => deque.head(),
            Direction::Backward => retreat(deque.tail(), deque.slot_count()),
        };
        Self {
            direction,
            cursor,
            remaining: deque.len(),
            last: None,
        }
    }

    /// Returns the traversal order.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` if the traversal has elements left.
    #[inline]
    pub const fn has_next(&self) -> bool {
        self.remaining > 0
    }

    /// Returns the number of elements left.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns the next element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] once the traversal is complete,
    /// or [`DequeError::ConcurrentModification`] if the slot under the cursor
    /// is no longer live.
    pub fn next<'a, T>(&mut self, deque: &'a IndexableDeque<T>) -> Result<&'a T, DequeError> {
        if self.remaining == 0 {
            return Err(DequeError::NoSuchElement);
        }
        let element = deque
            .slot(self.cursor)
            .ok_or(DequeError::ConcurrentModification)?;
        self.last = Some(self.cursor);
        self.cursor = self.step(self.cursor, deque.slot_count());
        self.remaining -= 1;
        Ok(element)
    }

    /// Removes the element most recently returned by [`next`](Self::next).
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoCurrentElement`] if `next` has not been called
    /// since the last removal, or [`DequeError::ConcurrentModification`] if
    /// that element is gone.
    pub fn remove<T>(&mut self, deque: &mut IndexableDeque<T>) -> Result<T, DequeError> {
        let last = self.last.take().ok_or(DequeError::NoCurrentElement)?;
        let (element, closed) = deque
            .delete(last)
            .ok_or(DequeError::ConcurrentModification)?;
        let modulus = deque.slot_count();
        match (self.direction, closed) {
            (Direction::Forward, Closed::Tail) => self.cursor = retreat(self.cursor, modulus),
            (Direction::Backward, Closed::Head) => self.cursor = advance(self.cursor, modulus),
            _ => {}
        }
        Ok(element)
    }

    /// Calls `action` on every remaining element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] without calling
    /// `action` if the deque no longer matches the cursor's position.
    pub fn for_each_remaining<T, F>(&mut self, deque: &IndexableDeque<T>, mut action: F) -> Result<(), DequeError>
    where
        F: FnMut(&T),
    {
        let remaining = std::mem::take(&mut self.remaining);
        if remaining == 0 {
            return Ok(());
        }
        let modulus = deque.slot_count();
        let expected = match self.direction {
            Direction::Forward => distance_from(deque.tail(), self.cursor, modulus),
            Direction::Backward => distance_from(self.cursor, deque.head(), modulus) + 1,
        };
        if deque.slot(self.cursor).is_none() || expected != remaining {
            return Err(DequeError::ConcurrentModification);
        }
        let mut position = self.cursor;
        for _ in 0..remaining {
            if let Some(element) = deque.slot(position) {
                action(element);
            }
            self.last = Some(position);
            position = self.step(position, modulus);
        }
        self.cursor = position;
        Ok(())
    }

    const fn step(&self, position: usize, modulus: usize) -> usize {
        match self.direction {
            Direction::Forward => advance(position, modulus),
            Direction::Backward => retreat(position, modulus),
        }
    }
}

// =============================================================================
// ListCursor
// =============================================================================

/// A bidirectional cursor that can replace, insert and remove elements.
///
/// The cursor sits between two elements. It records the live range it last
/// agreed with and refuses to move if the deque was changed by anything but
/// this cursor since.
///
/// Created by [`IndexableDeque::list_cursor`].
///
/// # Examples
///
/// ```rust
/// use indexable_deque::IndexableDeque;
///
/// let mut deque: IndexableDeque<char> = "ac".chars().collect();
/// let mut cursor = deque.list_cursor(1)?;
/// cursor.add(&mut deque, 'b')?;
/// assert_eq!(cursor.next_index(), 2);
/// assert_eq!(cursor.previous(&deque)?, &'b');
/// assert_eq!(deque.to_vec(), vec!['a', 'b', 'c']);
/// # Ok::<(), indexable_deque::DequeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCursor {
    cursor: usize,
    start: usize,
    end: usize,
    slot_count: usize,
    last: Option<usize>,
}

impl ListCursor {
    fn new<T>(deque: &IndexableDeque<T>, index: usize) -> Result<Self, DequeError> {
        let len = deque.len();
        if index > len {
            return Err(DequeError::IndexOutOfBounds { index, len });
        }
        Ok(Self {
            cursor: deque.physical(index),
            start: deque.head(),
            end: deque.tail(),
            slot_count: deque.slot_count(),
            last: None,
        })
    }

    /// Returns `true` if there is an element after the cursor.
    #[inline]
    pub const fn has_next(&self) -> bool {
        self.cursor != self.end
    }

    /// Returns `true` if there is an element before the cursor.
    #[inline]
    pub const fn has_previous(&self) -> bool {
        self.cursor != self.start
    }

    /// Returns the logical index of the element after the cursor.
    #[inline]
    pub const fn next_index(&self) -> usize {
        distance_from(self.cursor, self.start, self.slot_count)
    }

    /// Returns the logical index of the element before the cursor, or `None`
    /// at the front.
    #[inline]
    pub const fn previous_index(&self) -> Option<usize> {
        self.next_index().checked_sub(1)
    }

    /// Moves past the next element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] at the back, or
    /// [`DequeError::ConcurrentModification`] if the deque changed behind the
    /// cursor.
    pub fn next<'a, T>(&mut self, deque: &'a IndexableDeque<T>) -> Result<&'a T, DequeError> {
        let current = self.cursor;
        if current == self.end {
            return Err(DequeError::NoSuchElement);
        }
        self.check_modification(deque)?;
        self.cursor = advance(current, self.slot_count);
        self.last = Some(current);
        deque.slot(current).ok_or(DequeError::ConcurrentModification)
    }

    /// Moves before the previous element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] at the front, or
    /// [`DequeError::ConcurrentModification`] if the deque changed behind the
    /// cursor.
    pub fn previous<'a, T>(&mut self, deque: &'a IndexableDeque<T>) -> Result<&'a T, DequeError> {
        if self.cursor == self.start {
            return Err(DequeError::NoSuchElement);
        }
        self.check_modification(deque)?;
        self.cursor = retreat(self.cursor, self.slot_count);
        self.last = Some(self.cursor);
        deque.slot(self.cursor).ok_or(DequeError::ConcurrentModification)
    }

    /// Calls `action` on every element after the cursor and moves the cursor
    /// to the back.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] if the deque changed
    /// behind the cursor.
    pub fn for_each_remaining<T, F>(&mut self, deque: &IndexableDeque<T>, mut action: F) -> Result<(), DequeError>
    where
        F: FnMut(&T),
    {
        self.check_modification(deque)?;
        while self.cursor != self.end {
            if let Some(element) = deque.slot(self.cursor) {
                action(element);
            }
            self.last = Some(self.cursor);
            self.cursor = advance(self.cursor, self.slot_count);
        }
        Ok(())
    }

    /// Removes the element most recently returned by `next` or `previous`.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoCurrentElement`] if there is no such element,
    /// or [`DequeError::ConcurrentModification`] if the deque changed behind
    /// the cursor.
    pub fn remove<T>(&mut self, deque: &mut IndexableDeque<T>) -> Result<T, DequeError> {
        let last = self.last.ok_or(DequeError::NoCurrentElement)?;
        self.check_modification(deque)?;
        let current = self.cursor;
        let returned_by_previous = last == current;
        let (element, closed) = deque
            .delete(last)
            .ok_or(DequeError::ConcurrentModification)?;
        match closed {
            Closed::Tail => {
                if !returned_by_previous {
                    self.cursor = retreat(current, self.slot_count);
                }
                self.end = deque.tail();
            }
            Closed::Head => {
                if returned_by_previous {
                    self.cursor = advance(current, self.slot_count);
                }
                self.start = deque.head();
            }
        }
        self.last = None;
        Ok(element)
    }

    /// Replaces the element most recently returned by `next` or `previous`.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoCurrentElement`] if there is no such element,
    /// or [`DequeError::ConcurrentModification`] if the deque changed behind
    /// the cursor.
    pub fn set<T>(&self, deque: &mut IndexableDeque<T>, element: T) -> Result<T, DequeError> {
        let last = self.last.ok_or(DequeError::NoCurrentElement)?;
        self.check_modification(deque)?;
        deque
            .replace_slot(last, element)
            .ok_or(DequeError::ConcurrentModification)
    }

    /// Inserts `element` before the cursor, so a following `previous` returns
    /// it and a following `next` is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] if the deque changed
    /// behind the cursor, or [`DequeError::CapacityOverflow`] if it could not
    /// grow.
    pub fn add<T>(&mut self, deque: &mut IndexableDeque<T>, element: T) -> Result<(), DequeError> {
        self.check_modification(deque)?;
        let current = self.cursor;
        match deque.insert_physical(current, element)? {
            Shift::Reallocated => {
                self.cursor = distance_from(current, self.start, self.slot_count) + 1;
                self.start = deque.head();
                self.end = deque.tail();
                self.slot_count = deque.slot_count();
            }
            Shift::Tail => {
                self.cursor = advance(current, self.slot_count);
                self.end = deque.tail();
            }
            Shift::Head => self.start = deque.head(),
        }
        self.last = None;
        Ok(())
    }

    fn check_modification<T>(&self, deque: &IndexableDeque<T>) -> Result<(), DequeError> {
        if deque.head() == self.start && deque.tail() == self.end && deque.slot_count() == self.slot_count {
            Ok(())
        } else {
            Err(DequeError::ConcurrentModification)
        }
    }
}

// =============================================================================
// Entry points
// =============================================================================

impl<T> IndexableDeque<T> {
    /// Returns a front-to-back cursor positioned before the first element.
    pub fn cursor(&self) -> DequeCursor {
        DequeCursor::new(self, Direction::Forward)
    }

    /// Returns a back-to-front cursor positioned after the last element.
    pub fn descending_cursor(&self) -> DequeCursor {
        DequeCursor::new(self, Direction::Backward)
    }

    /// Returns a list cursor positioned before logical index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] if `index > len()`.
    pub fn list_cursor(&self, index: usize) -> Result<ListCursor, DequeError> {
        ListCursor::new(self, index)
    }
}
