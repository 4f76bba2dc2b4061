//! The synced deque.

use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::fmt;

use parking_lot::ReentrantMutexGuard;

use super::lock::ReentrantLock;
use crate::deque::IndexableDeque;
use crate::error::DequeError;

/// An [`IndexableDeque`] whose operations are serialized by a reentrant lock.
///
/// Every operation acquires the lock interruptibly, so it can fail with
/// [`DequeError::Cancelled`] if the calling thread is interrupted. Elements
/// are returned by value (cloned where the deque keeps them), since no
/// reference may outlive the lock.
///
/// Callbacks such as the predicate of [`remove_where`](Self::remove_where)
/// run while the lock is held. They may read the deque through `&self`, but
/// an attempt to modify it from inside a callback fails with
/// [`DequeError::ConcurrentModification`].
///
/// Multi-step work, including iteration, belongs inside
/// [`with_locked`](Self::with_locked) or a guard from
/// [`lock_interruptibly`](Self::lock_interruptibly).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use indexable_deque::SharedDeque;
///
/// let shared = Arc::new(SharedDeque::new());
/// std::thread::scope(|scope| {
///     for worker in 0..4 {
///         let shared = Arc::clone(&shared);
///         scope.spawn(move || {
///             for value in 0..100 {
///                 shared.push_back(worker * 100 + value).unwrap();
///             }
///         });
///     }
/// });
/// assert_eq!(shared.len()?, 400);
/// # Ok::<(), indexable_deque::DequeError>(())
/// ```
pub struct SharedDeque<T> {
    lock: ReentrantLock<RefCell<IndexableDeque<T>>>,
}

/// Exclusive access to a [`SharedDeque`] for a multi-step critical section.
///
/// The lock is released when the guard is dropped.
pub struct SharedGuard<'a, T> {
    guard: ReentrantMutexGuard<'a, RefCell<IndexableDeque<T>>>,
}

impl<T> SharedGuard<'_, T> {
    /// Borrows the deque for reading.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] if the deque is
    /// currently borrowed for writing on this thread.
    pub fn deque(&self) -> Result<Ref<'_, IndexableDeque<T>>, DequeError> {
        self.guard
            .try_borrow()
            .map_err(|_| DequeError::ConcurrentModification)
    }

    /// Borrows the deque for writing.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] if the deque is
    /// currently borrowed on this thread.
    pub fn deque_mut(&self) -> Result<RefMut<'_, IndexableDeque<T>>, DequeError> {
        self.guard
            .try_borrow_mut()
            .map_err(|_| DequeError::ConcurrentModification)
    }
}

impl<T> SharedDeque<T> {
    /// Creates an empty synced deque with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::from_deque(IndexableDeque::new())
    }

    /// Creates an empty synced deque with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_deque(IndexableDeque::with_capacity(capacity))
    }

    /// Wraps an existing deque.
    #[must_use]
    pub fn from_deque(deque: IndexableDeque<T>) -> Self {
        Self {
            lock: ReentrantLock::new(RefCell::new(deque)),
        }
    }

    /// Returns `true`.
    #[inline]
    pub const fn is_synced(&self) -> bool {
        true
    }

    /// Consumes the wrapper and returns the deque.
    pub fn into_inner(self) -> IndexableDeque<T> {
        self.lock.into_inner().into_inner()
    }

    /// Acquires the lock for a multi-step critical section.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the calling thread is
    /// interrupted before the lock is acquired.
    pub fn lock_interruptibly(&self) -> Result<SharedGuard<'_, T>, DequeError> {
        self.lock
            .lock_interruptibly()
            .map(|guard| SharedGuard { guard })
    }

    /// Runs `action` with exclusive access to the deque.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the lock could not be acquired,
    /// or [`DequeError::ConcurrentModification`] if called from inside a
    /// callback of this deque.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexable_deque::SharedDeque;
    ///
    /// let shared: SharedDeque<i32> = (1..=4).collect();
    /// let sum = shared.with_locked(|deque| {
    ///     deque.push_front(0);
    ///     deque.iter().sum::<i32>()
    /// })?;
    /// assert_eq!(sum, 10);
    /// # Ok::<(), indexable_deque::DequeError>(())
    /// ```
    pub fn with_locked<R, F>(&self, action: F) -> Result<R, DequeError>
    where
        F: FnOnce(&mut IndexableDeque<T>) -> R,
    {
        self.write(action)
    }

    fn read<R, F>(&self, action: F) -> Result<R, DequeError>
    where
        F: FnOnce(&IndexableDeque<T>) -> R,
    {
        let guard = self.lock_interruptibly()?;
        let deque = guard.deque()?;
        Ok(action(&deque))
    }

    fn write<R, F>(&self, action: F) -> Result<R, DequeError>
    where
        F: FnOnce(&mut IndexableDeque<T>) -> R,
    {
        let guard = self.lock_interruptibly()?;
        let mut deque = guard.deque_mut()?;
        Ok(action(&mut deque))
    }

    // =========================================================================
    // Size and capacity
    // =========================================================================

    /// Returns the number of elements.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the lock could not be acquired.
    pub fn len(&self) -> Result<usize, DequeError> {
        self.read(IndexableDeque::len)
    }

    /// Returns `true` if the deque holds no elements.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the lock could not be acquired.
    pub fn is_empty(&self) -> Result<bool, DequeError> {
        self.read(IndexableDeque::is_empty)
    }

    /// Returns the number of elements the deque can hold without
    /// reallocating.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the lock could not be acquired.
    pub fn capacity(&self) -> Result<usize, DequeError> {
        self.read(IndexableDeque::capacity)
    }

    /// See [`IndexableDeque::ensure_capacity`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`], [`DequeError::ConcurrentModification`]
    /// or [`DequeError::CapacityOverflow`].
    pub fn ensure_capacity(&self, min_capacity: usize) -> Result<(), DequeError> {
        self.write(|deque| deque.ensure_capacity(min_capacity))?
    }

    /// See [`IndexableDeque::try_trim_to_size`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`], [`DequeError::ConcurrentModification`]
    /// or [`DequeError::CapacityOverflow`].
    pub fn trim_to_size(&self) -> Result<(), DequeError> {
        self.write(IndexableDeque::try_trim_to_size)?
    }

    // =========================================================================
    // Deque operations
    // =========================================================================

    /// Inserts `element` at the front.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`], [`DequeError::ConcurrentModification`]
    /// or [`DequeError::CapacityOverflow`].
    pub fn push_front(&self, element: T) -> Result<(), DequeError> {
        self.write(|deque| deque.try_push_front(element))?
    }

    /// Inserts `element` at the back.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`], [`DequeError::ConcurrentModification`]
    /// or [`DequeError::CapacityOverflow`].
    pub fn push_back(&self, element: T) -> Result<(), DequeError> {
        self.write(|deque| deque.try_push_back(element))?
    }

    /// Removes and returns the front element, or `None` if empty.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn pop_front(&self) -> Result<Option<T>, DequeError> {
        self.write(IndexableDeque::pop_front)
    }

    /// Removes and returns the back element, or `None` if empty.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn pop_back(&self) -> Result<Option<T>, DequeError> {
        self.write(IndexableDeque::pop_back)
    }

    /// Removes and returns the front element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty, besides
    /// the lock errors.
    pub fn remove_first(&self) -> Result<T, DequeError> {
        self.write(IndexableDeque::remove_first)?
    }

    /// Removes and returns the back element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty, besides
    /// the lock errors.
    pub fn remove_last(&self) -> Result<T, DequeError> {
        self.write(IndexableDeque::remove_last)?
    }

    /// Returns a copy of the front element, or `None` if empty.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn peek_front(&self) -> Result<Option<T>, DequeError>
    where
        T: Clone,
    {
        self.read(|deque| deque.peek_front().cloned())
    }

    /// Returns a copy of the back element, or `None` if empty.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn peek_back(&self) -> Result<Option<T>, DequeError>
    where
        T: Clone,
    {
        self.read(|deque| deque.peek_back().cloned())
    }

    /// Returns a copy of the front element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty, besides
    /// the lock errors.
    pub fn get_first(&self) -> Result<T, DequeError>
    where
        T: Clone,
    {
        self.read(|deque| deque.get_first().cloned())?
    }

    /// Returns a copy of the back element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::NoSuchElement`] if the deque is empty, besides
    /// the lock errors.
    pub fn get_last(&self) -> Result<T, DequeError>
    where
        T: Clone,
    {
        self.read(|deque| deque.get_last().cloned())?
    }

    // =========================================================================
    // Positional operations
    // =========================================================================

    /// Returns a copy of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] if `index >= len()`, besides
    /// the lock errors.
    pub fn get(&self, index: usize) -> Result<T, DequeError>
    where
        T: Clone,
    {
        self.read(|deque| deque.try_get(index).cloned())?
    }

    /// See [`IndexableDeque::set`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] besides the lock errors.
    pub fn set(&self, index: usize, element: T) -> Result<T, DequeError> {
        self.write(|deque| deque.set(index, element))?
    }

    /// See [`IndexableDeque::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] or
    /// [`DequeError::CapacityOverflow`] besides the lock errors.
    pub fn insert(&self, index: usize, element: T) -> Result<(), DequeError> {
        self.write(|deque| deque.insert(index, element))?
    }

    /// See [`IndexableDeque::remove_at`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] besides the lock errors.
    pub fn remove_at(&self, index: usize) -> Result<T, DequeError> {
        self.write(|deque| deque.remove_at(index))?
    }

    /// See [`IndexableDeque::remove_at_random`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn remove_at_random(&self) -> Result<Option<T>, DequeError> {
        self.write(IndexableDeque::remove_at_random)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// See [`IndexableDeque::contains`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn contains(&self, value: &T) -> Result<bool, DequeError>
    where
        T: PartialEq,
    {
        self.read(|deque| deque.contains(value))
    }

    /// See [`IndexableDeque::index_of`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn index_of(&self, value: &T) -> Result<Option<usize>, DequeError>
    where
        T: PartialEq,
    {
        self.read(|deque| deque.index_of(value))
    }

    /// See [`IndexableDeque::last_index_of`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn last_index_of(&self, value: &T) -> Result<Option<usize>, DequeError>
    where
        T: PartialEq,
    {
        self.read(|deque| deque.last_index_of(value))
    }

    /// See [`IndexableDeque::remove_first_occurrence`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn remove_first_occurrence(&self, value: &T) -> Result<bool, DequeError>
    where
        T: PartialEq,
    {
        self.write(|deque| deque.remove_first_occurrence(value))
    }

    /// See [`IndexableDeque::remove_last_occurrence`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn remove_last_occurrence(&self, value: &T) -> Result<bool, DequeError>
    where
        T: PartialEq,
    {
        self.write(|deque| deque.remove_last_occurrence(value))
    }

    // =========================================================================
    // Bulk operations
    // =========================================================================

    /// See [`IndexableDeque::try_add_all`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::CapacityOverflow`] besides the lock errors.
    pub fn add_all<I>(&self, elements: I) -> Result<bool, DequeError>
    where
        I: IntoIterator<Item = T>,
    {
        self.write(|deque| deque.try_add_all(elements))?
    }

    /// See [`IndexableDeque::insert_all`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::IndexOutOfBounds`] or
    /// [`DequeError::CapacityOverflow`] besides the lock errors.
    pub fn insert_all<I>(&self, index: usize, elements: I) -> Result<bool, DequeError>
    where
        I: IntoIterator<Item = T>,
    {
        self.write(|deque| deque.insert_all(index, elements))?
    }

    /// Removes every element for which `predicate` returns `true`.
    ///
    /// The predicate runs with the lock held and may read this deque. The
    /// removal itself happens after the predicate has seen every element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] if called from inside a
    /// callback of this deque, besides [`DequeError::Cancelled`].
    pub fn remove_where<F>(&self, predicate: F) -> Result<bool, DequeError>
    where
        F: FnMut(&T) -> bool,
    {
        let guard = self.lock_interruptibly()?;
        let plan = guard.deque()?.plan_removal(predicate);
        match plan {
            Some(plan) => {
                guard.deque_mut()?.expunge(&plan)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Keeps only the elements for which `predicate` returns `true`.
    ///
    /// # Errors
    ///
    /// See [`remove_where`](Self::remove_where).
    pub fn retain<F>(&self, mut predicate: F) -> Result<bool, DequeError>
    where
        F: FnMut(&T) -> bool,
    {
        self.remove_where(|element| !predicate(element))
    }

    /// Removes every element that equals one of `values`.
    ///
    /// # Errors
    ///
    /// See [`remove_where`](Self::remove_where).
    pub fn remove_all(&self, values: &[T]) -> Result<bool, DequeError>
    where
        T: PartialEq,
    {
        self.remove_where(|element| values.contains(element))
    }

    /// Removes every element that equals none of `values`.
    ///
    /// # Errors
    ///
    /// See [`remove_where`](Self::remove_where).
    pub fn retain_all(&self, values: &[T]) -> Result<bool, DequeError>
    where
        T: PartialEq,
    {
        self.remove_where(|element| !values.contains(element))
    }

    /// Removes every element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn clear(&self) -> Result<(), DequeError> {
        self.write(IndexableDeque::clear)
    }

    /// Calls `action` on each element, front to back, with the lock held.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn for_each<F>(&self, action: F) -> Result<(), DequeError>
    where
        F: FnMut(&T),
    {
        self.read(|deque| deque.for_each(action))
    }

    /// See [`IndexableDeque::replace_all`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn replace_all<F>(&self, operator: F) -> Result<(), DequeError>
    where
        F: FnMut(&T) -> T,
    {
        self.write(|deque| deque.replace_all(operator))
    }

    /// See [`IndexableDeque::sort_by`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn sort_by<F>(&self, compare: F) -> Result<(), DequeError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.write(|deque| deque.sort_by(compare))
    }

    /// See [`IndexableDeque::sort`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn sort(&self) -> Result<(), DequeError>
    where
        T: Ord,
    {
        self.write(IndexableDeque::sort)
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Returns the elements front to back in a new vector.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn to_vec(&self) -> Result<Vec<T>, DequeError>
    where
        T: Clone,
    {
        self.read(IndexableDeque::to_vec)
    }

    /// Returns a copy of the deque.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn snapshot(&self) -> Result<IndexableDeque<T>, DequeError>
    where
        T: Clone,
    {
        self.read(Clone::clone)
    }

    /// See [`IndexableDeque::sequence_hash`].
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] or [`DequeError::ConcurrentModification`].
    pub fn sequence_hash(&self) -> Result<u64, DequeError>
    where
        T: std::hash::Hash,
    {
        self.read(IndexableDeque::sequence_hash)
    }
}

impl<T> Default for SharedDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<IndexableDeque<T>> for SharedDeque<T> {
    fn from(deque: IndexableDeque<T>) -> Self {
        Self::from_deque(deque)
    }
}

impl<T> FromIterator<T> for SharedDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_deque(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedDeque<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = formatter.debug_struct("SharedDeque");
        match self.lock.try_lock() {
            Some(guard) => match guard.try_borrow() {
                Ok(deque) => debug.field("deque", &*deque),
                Err(_) => debug.field("deque", &format_args!("<borrowed>")),
            },
            None => debug.field("deque", &format_args!("<locked>")),
        };
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::interrupt;
    use rstest::rstest;

    #[rstest]
    fn test_basic_operations() {
        let shared: SharedDeque<i32> = SharedDeque::with_capacity(4);
        shared.push_back(2).unwrap();
        shared.push_front(1).unwrap();
        shared.insert(2, 3).unwrap();
        assert_eq!(shared.to_vec(), Ok(vec![1, 2, 3]));
        assert_eq!(shared.get(1), Ok(2));
        assert_eq!(shared.get(3), Err(DequeError::IndexOutOfBounds { index: 3, len: 3 }));
        assert_eq!(shared.pop_back(), Ok(Some(3)));
        assert_eq!(shared.remove_first(), Ok(1));
        assert_eq!(shared.len(), Ok(1));
    }

    #[rstest]
    fn test_trim_to_size_shrinks_under_the_lock() {
        let shared: SharedDeque<i32> = SharedDeque::with_capacity(32);
        shared.add_all([1, 2, 3]).unwrap();
        assert_eq!(shared.trim_to_size(), Ok(()));
        assert_eq!(shared.capacity(), Ok(3));
        assert_eq!(shared.to_vec(), Ok(vec![1, 2, 3]));
    }

    #[rstest]
    fn test_predicate_may_read() {
        let shared: SharedDeque<i32> = (1..=6).collect();
        let removed = shared.remove_where(|value| {
            let len = shared.len().unwrap();
            *value * 2 > len as i32
        });
        assert_eq!(removed, Ok(true));
        assert_eq!(shared.to_vec(), Ok(vec![1, 2, 3]));
    }

    #[rstest]
    fn test_callback_writer_is_rejected() {
        let shared: SharedDeque<i32> = (1..=3).collect();
        let mut attempts = Vec::new();
        shared
            .for_each(|value| attempts.push(shared.push_back(*value)))
            .unwrap();
        assert!(attempts.iter().all(|attempt| *attempt == Err(DequeError::ConcurrentModification)));
        assert_eq!(shared.len(), Ok(3));
    }

    #[rstest]
    fn test_interrupted_thread_is_cancelled() {
        let shared: SharedDeque<i32> = SharedDeque::new();
        interrupt::interrupt_current();
        assert_eq!(shared.push_back(1), Err(DequeError::Cancelled));
        assert!(interrupt::interrupted());
        assert_eq!(shared.push_back(1), Ok(()));
    }

    #[rstest]
    fn test_debug_while_locked() {
        let shared: SharedDeque<i32> = (1..=2).collect();
        assert_eq!(format!("{shared:?}"), "SharedDeque { deque: [1, 2] }");
        shared
            .with_locked(|_| {
                let debug = std::thread::scope(|scope| scope.spawn(|| format!("{shared:?}")).join().unwrap());
                assert_eq!(debug, "SharedDeque { deque: <locked> }");
            })
            .unwrap();
    }
}
