//! Late-binding, splittable traversal.
//!
//! A [`Spliter`] covers a circular range of slots. The range of a fresh
//! spliter is left open until the first call that needs it, and
//! [`Spliter::try_split`] hands the first half of the remaining range to a
//! new spliter, which is how the elements are divided among workers.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{BitOr, BitOrAssign};

use super::IndexableDeque;
use super::ring::{advance, advance_by, distance_from, retreat};
use crate::error::DequeError;

/// Properties a [`Spliter`] guarantees about the elements it yields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Characteristics(u8);

impl Characteristics {
    /// The number of remaining elements is known exactly.
    pub const SIZED: Self = Self(1);
    /// Every spliter produced by splitting is also `SIZED`.
    pub const SUBSIZED: Self = Self(1 << 1);
    /// Elements are yielded front to back.
    pub const ORDERED: Self = Self(1 << 2);
    /// No yielded element is missing.
    pub const NONNULL: Self = Self(1 << 3);

    /// Returns the empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every property in `other` is also in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Characteristics {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Characteristics {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Characteristics {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::SIZED, "SIZED"),
            (Self::SUBSIZED, "SUBSIZED"),
            (Self::ORDERED, "ORDERED"),
            (Self::NONNULL, "NONNULL"),
        ];
        let mut set = formatter.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// A splittable iterator over a range of an [`IndexableDeque`].
///
/// Created by [`IndexableDeque::spliter`].
///
/// # Examples
///
/// ```rust
/// use indexable_deque::IndexableDeque;
///
/// let deque: IndexableDeque<i32> = (1..=6).collect();
/// let mut back = deque.spliter();
/// let front = back.try_split().unwrap();
/// assert_eq!(front.collect::<Vec<_>>(), vec![&1, &2, &3]);
/// assert_eq!(back.estimate_size(), 3);
/// ```
pub struct Spliter<'a, T> {
    deque: &'a IndexableDeque<T>,
    /// `None` until the range is bound.
    fence: Option<usize>,
    cursor: usize,
}

impl<'a, T> Spliter<'a, T> {
    const fn unbound(deque: &'a IndexableDeque<T>) -> Self {
        Self {
            deque,
            fence: None,
            cursor: 0,
        }
    }

    const fn with_range(deque: &'a IndexableDeque<T>, origin: usize, fence: usize) -> Self {
        Self {
            deque,
            fence: Some(fence),
            cursor: origin,
        }
    }

    /// Binds the range to the live range on first use and returns the fence.
    fn fence(&mut self) -> usize {
        match self.fence {
            Some(fence) => fence,
            None => {
                self.cursor = self.deque.head();
                let fence = self.deque.tail();
                self.fence = Some(fence);
                fence
            }
        }
    }

    /// Splits off the first half of the remaining range.
    ///
    /// Returns `None` when fewer than two elements remain.
    pub fn try_split(&mut self) -> Option<Self> {
        let modulus = self.deque.slot_count();
        let fence = self.fence();
        let origin = self.cursor;
        let half = distance_from(fence, origin, modulus) >> 1;
        if half == 0 {
            return None;
        }
        self.cursor = advance_by(origin, half, modulus);
        Some(Self::with_range(self.deque, origin, self.cursor))
    }

    /// Calls `action` on the next element, if any.
    ///
    /// Returns `Ok(false)` once the range is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] if the slot under the
    /// cursor is not live.
    pub fn try_advance<F>(&mut self, action: F) -> Result<bool, DequeError>
    where
        F: FnOnce(&'a T),
    {
        let fence = self.fence();
        let position = self.cursor;
        if position == fence {
            return Ok(false);
        }
        let element = self
            .deque
            .slot(position)
            .ok_or(DequeError::ConcurrentModification)?;
        self.cursor = advance(position, self.deque.slot_count());
        action(element);
        Ok(true)
    }

    /// Calls `action` on every remaining element.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::ConcurrentModification`] without calling
    /// `action` if either end of the remaining range is not live.
    pub fn for_each_remaining<F>(&mut self, mut action: F) -> Result<(), DequeError>
    where
        F: FnMut(&'a T),
    {
        let fence = self.fence();
        let origin = self.cursor;
        if origin == fence {
            return Ok(());
        }
        let modulus = self.deque.slot_count();
        self.cursor = fence;
        // checking both ends is enough: the live range is contiguous
        if self.deque.slot(origin).is_none() || self.deque.slot(retreat(fence, modulus)).is_none() {
            return Err(DequeError::ConcurrentModification);
        }
        let mut position = origin;
        while position != fence {
            if let Some(element) = self.deque.slot(position) {
                action(element);
            }
            position = advance(position, modulus);
        }
        Ok(())
    }

    /// Returns the number of elements left, binding the range if needed.
    pub fn estimate_size(&mut self) -> usize {
        let fence = self.fence();
        distance_from(fence, self.cursor, self.deque.slot_count())
    }

    /// Returns the properties this spliter guarantees.
    #[must_use]
    pub fn characteristics(&self) -> Characteristics {
        Characteristics::SIZED | Characteristics::SUBSIZED | Characteristics::ORDERED | Characteristics::NONNULL
    }
}

impl<T> fmt::Debug for Spliter<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Spliter")
            .field("fence", &self.fence)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<'a, T> Iterator for Spliter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let fence = self.fence();
        let position = self.cursor;
        if position == fence {
            return None;
        }
        self.cursor = advance(position, self.deque.slot_count());
        // the shared borrow pins the live range, so every slot before the fence is filled
        self.deque.slot(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.fence {
            Some(fence) => distance_from(fence, self.cursor, self.deque.slot_count()),
            None => self.deque.len(),
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Spliter<'_, T> {}

impl<T> FusedIterator for Spliter<'_, T> {}

impl<T> IndexableDeque<T> {
    /// Returns a late-binding splittable iterator over the elements.
    pub fn spliter(&self) -> Spliter<'_, T> {
        Spliter::unbound(self)
    }
}
