//! The ordered, sized, indexable container capability.
//!
//! [`Indexable`] is the narrow view of a sequence that equality needs: a
//! length and positional access. [`IndexableDeque`] compares itself against
//! anything implementing it, so a deque equals a `Vec`, slice, array or
//! `VecDeque` holding the same elements in the same order.

use std::collections::VecDeque;

use crate::deque::IndexableDeque;

/// A finite sequence with constant-time positional access.
///
/// # Laws
///
/// - `get(i)` is `Some` exactly when `i < len()`.
/// - `is_empty()` is `len() == 0`.
///
/// # Examples
///
/// ```rust
/// use indexable_deque::Indexable;
///
/// fn last<C: Indexable + ?Sized>(container: &C) -> Option<&C::Item> {
///     container.len().checked_sub(1).and_then(|index| container.get(index))
/// }
///
/// assert_eq!(last(&vec![1, 2, 3]), Some(&3));
/// assert_eq!(last(&[0_u8; 0][..]), None);
/// ```
pub trait Indexable {
    /// The element type.
    type Item;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns the element at `index`, or `None` if out of range.
    fn get(&self, index: usize) -> Option<&Self::Item>;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both containers hold equal elements in the same
    /// order.
    ///
    /// Compares the lengths first, then the elements by position.
    fn elements_eq<O>(&self, other: &O) -> bool
    where
        O: ?Sized + Indexable,
        Self::Item: PartialEq<O::Item>,
    {
        let len = self.len();
        len == other.len()
            && (0..len).all(|index| match (self.get(index), other.get(index)) {
                (Some(left), Some(right)) => left == right,
                _ => false,
            })
    }
}

impl<T> Indexable for IndexableDeque<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        Self::get(self, index)
    }
}

impl<T> Indexable for [T] {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T, const N: usize> Indexable for [T; N] {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T> Indexable for Vec<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T> Indexable for VecDeque<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        Self::get(self, index)
    }
}
