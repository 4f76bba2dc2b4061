//! Error types for deque operations.
//!
//! Every fallible operation of [`IndexableDeque`](crate::deque::IndexableDeque)
//! and [`SharedDeque`](crate::sync::SharedDeque) reports failure through
//! [`DequeError`]. No error is retried internally and a failed operation leaves
//! the deque exactly as it was before the call.

use thiserror::Error;

/// Represents errors that can occur when operating on a deque.
///
/// # Examples
///
/// ```rust
/// use indexable_deque::{DequeError, IndexableDeque};
///
/// let deque: IndexableDeque<i32> = IndexableDeque::new();
/// assert_eq!(
///     deque.try_get(3),
///     Err(DequeError::IndexOutOfBounds { index: 3, len: 0 })
/// );
/// assert_eq!(
///     DequeError::IndexOutOfBounds { index: 3, len: 0 }.to_string(),
///     "index 3 out of bounds for length 0"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DequeError {
    /// A positional operation was given an index outside the valid range.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// The length of the deque when the index was checked.
        len: usize,
    },

    /// A nullable source contained an empty element.
    #[error("null element at position {index}")]
    NullElement {
        /// Position of the first empty element in the source.
        index: usize,
    },

    /// Growth would exceed the maximum number of slots that can be allocated.
    #[error("deque too large: cannot allocate {requested} slots")]
    CapacityOverflow {
        /// The slot count that could not be provided.
        requested: usize,
    },

    /// The live range changed underneath a traversal or a reentrant writer
    /// tried to mutate a deque that is currently being traversed.
    #[error("deque was structurally modified during traversal")]
    ConcurrentModification,

    /// The calling thread was interrupted while acquiring the deque lock.
    ///
    /// The thread's interruption flag is left set so that the cancellation
    /// can be propagated further up the call stack.
    #[error("interrupted while waiting to acquire the deque lock")]
    Cancelled,

    /// A strict accessor was called on an empty deque, or a cursor was
    /// advanced past its end.
    #[error("no such element")]
    NoSuchElement,

    /// A cursor `remove` or `set` was called without a preceding `next` or
    /// `previous`, or after the element it returned was already removed.
    #[error("no current element: call next or previous first")]
    NoCurrentElement,
}

impl DequeError {
    /// Returns `true` if this error reports a structural conflict.
    ///
    /// Callers recovering from a conflict retry the whole traversal.
    #[inline]
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }

    /// Returns `true` if this error reports a cancelled lock acquisition.
    #[inline]
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DequeError::IndexOutOfBounds { index: 5, len: 2 }, "index 5 out of bounds for length 2")]
    #[case(DequeError::NullElement { index: 1 }, "null element at position 1")]
    #[case(
        DequeError::CapacityOverflow { requested: 9 },
        "deque too large: cannot allocate 9 slots"
    )]
    #[case(
        DequeError::ConcurrentModification,
        "deque was structurally modified during traversal"
    )]
    #[case(
        DequeError::Cancelled,
        "interrupted while waiting to acquire the deque lock"
    )]
    #[case(DequeError::NoSuchElement, "no such element")]
    fn test_display(#[case] error: DequeError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_classification() {
        assert!(DequeError::ConcurrentModification.is_conflict());
        assert!(!DequeError::Cancelled.is_conflict());
        assert!(DequeError::Cancelled.is_cancelled());
        assert!(!DequeError::NoSuchElement.is_cancelled());
    }

    #[rstest]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&DequeError::NoSuchElement);
    }
}
