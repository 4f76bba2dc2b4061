//! # indexable-deque
//!
//! A growable circular-buffer deque that is also a random-access list.
//!
//! ## Overview
//!
//! [`IndexableDeque`] keeps its elements in one contiguous buffer addressed
//! with wrap-around arithmetic. On top of the usual double-ended queue
//! operations it offers:
//!
//! - **Positional access**: `get`, `set`, `insert`, `remove_at`
//! - **Search**: `index_of`, `last_index_of`, first/last occurrence removal
//! - **Bulk operations**: `add_all`, `insert_all`, `remove_where`, `retain`
//! - **Stable sorting** of the live elements in place
//! - **Cursors** that can remove, replace and insert while walking
//! - **Splitting traversal** through [`Spliter`] and, with the `rayon`
//!   feature, a parallel iterator
//!
//! ## Feature Flags
//!
//! - `sync` (default): [`SharedDeque`], a deque behind a reentrant lock whose
//!   acquisition can be cancelled by interrupting the waiting thread
//! - `rayon`: `IntoParallelIterator` for `&IndexableDeque<T>`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use indexable_deque::prelude::*;
//!
//! let mut deque: IndexableDeque<i32> = (1..=6).collect();
//! deque.push_front(0);
//! deque.insert(3, 42)?;
//! assert_eq!(deque[3], 42);
//!
//! deque.retain(|value| value % 2 == 0);
//! deque.sort_by(|left, right| right.cmp(left));
//! assert_eq!(deque, [42, 6, 4, 2, 0]);
//! # Ok::<(), DequeError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use indexable_deque::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::DequeConfig;
    pub use crate::deque::{DequeCursor, IndexableDeque, ListCursor};
    pub use crate::error::DequeError;
    pub use crate::indexable::Indexable;

    #[cfg(feature = "sync")]
    pub use crate::sync::SharedDeque;
}

pub mod config;
pub mod deque;
pub mod error;
pub mod indexable;

#[cfg(feature = "sync")]
pub mod sync;

pub use config::DequeConfig;
pub use deque::{
    Characteristics, DEFAULT_CAPACITY, DequeCursor, Direction, IndexableDeque, IntoIter, Iter,
    IterMut, ListCursor, Spliter,
};
#[cfg(feature = "rayon")]
pub use deque::ParIter;
pub use error::DequeError;
pub use indexable::Indexable;
#[cfg(feature = "sync")]
pub use sync::{SharedDeque, SharedGuard};

static_assertions::assert_impl_all!(IndexableDeque<i32>: Send, Sync, Clone);
static_assertions::assert_impl_all!(DequeError: Send, Sync, std::error::Error);
#[cfg(feature = "sync")]
static_assertions::assert_impl_all!(SharedDeque<i32>: Send, Sync);
#[cfg(feature = "sync")]
static_assertions::assert_not_impl_any!(SharedDeque<std::rc::Rc<i32>>: Send, Sync);
