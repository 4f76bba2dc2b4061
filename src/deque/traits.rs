//! Standard trait implementations for [`IndexableDeque`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use super::IndexableDeque;
use crate::error::DequeError;
use crate::indexable::Indexable;

// =============================================================================
// Equality and hashing
// =============================================================================

/// Compares element-wise against any [`Indexable`] container.
///
/// # Examples
///
/// ```rust
/// use std::collections::VecDeque;
/// use indexable_deque::IndexableDeque;
///
/// let deque: IndexableDeque<i32> = [1, 2, 3].into();
/// assert_eq!(deque, vec![1, 2, 3]);
/// assert_eq!(deque, VecDeque::from([1, 2, 3]));
/// assert_ne!(deque, [1, 2]);
/// ```
impl<T, I> PartialEq<I> for IndexableDeque<T>
where
    I: ?Sized + Indexable,
    T: PartialEq<I::Item>,
{
    fn eq(&self, other: &I) -> bool {
        self.elements_eq(other)
    }
}

impl<T: Eq> Eq for IndexableDeque<T> {}

impl<T: Hash> Hash for IndexableDeque<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for element in self {
            element.hash(state);
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

impl<T: fmt::Debug> fmt::Debug for IndexableDeque<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self).finish()
    }
}

/// Formats the elements front to back as `[a, b, c]`.
impl<T: fmt::Display> fmt::Display for IndexableDeque<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{element}")?;
        }
        formatter.write_str("]")
    }
}

// =============================================================================
// Indexing
// =============================================================================

impl<T> Index<usize> for IndexableDeque<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(element) => element,
            None => out_of_bounds(index, self.len()),
        }
    }
}

impl<T> IndexMut<usize> for IndexableDeque<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len();
        match self.get_mut(index) {
            Some(element) => element,
            None => out_of_bounds(index, len),
        }
    }
}

#[cold]
#[track_caller]
fn out_of_bounds(index: usize, len: usize) -> ! {
    panic!("{}", DequeError::IndexOutOfBounds { index, len })
}

// =============================================================================
// Construction and extension
// =============================================================================

impl<T> FromIterator<T> for IndexableDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T> From<Vec<T>> for IndexableDeque<T> {
    fn from(elements: Vec<T>) -> Self {
        let mut deque = Self::with_capacity(elements.len());
        deque.add_all(elements);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for IndexableDeque<T> {
    fn from(elements: [T; N]) -> Self {
        Self::from(Vec::from(elements))
    }
}

impl<T> Extend<T> for IndexableDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Err(error) = self.ensure_capacity(self.len().saturating_add(lower)) {
            super::capacity_overflow(error);
        }
        for element in iter {
            self.push_back(element);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for IndexableDeque<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}
