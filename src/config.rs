//! Construction-time options.
//!
//! Whether a deque is synced is decided by its type:
//! [`DequeConfig::build`] returns an unsynchronized [`IndexableDeque`] and
//! [`DequeConfig::build_shared`] a lock-protected `SharedDeque`.

use crate::deque::{DEFAULT_CAPACITY, IndexableDeque};
#[cfg(feature = "sync")]
use crate::sync::SharedDeque;

/// Options for creating a deque.
///
/// # Examples
///
/// ```rust
/// use indexable_deque::DequeConfig;
///
/// let mut deque = DequeConfig::new().capacity(4).build();
/// deque.push_back("a");
/// assert_eq!(deque.capacity(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DequeConfig {
    /// Number of elements the deque holds before its first reallocation.
    pub capacity_hint: usize,
}

impl Default for DequeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DequeConfig {
    /// Creates a configuration with the default capacity of
    /// [`DEFAULT_CAPACITY`] elements.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capacity_hint: DEFAULT_CAPACITY,
        }
    }

    /// Sets the capacity hint.
    #[must_use]
    pub const fn capacity(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }

    /// Returns the capacity hint.
    #[must_use]
    pub const fn capacity_hint(&self) -> usize {
        self.capacity_hint
    }

    /// Reads the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `{prefix}_CAPACITY`: capacity hint (default: 16)
    ///
    /// Values that do not parse fall back to the default.
    #[must_use]
    pub fn from_env(prefix: &str) -> Self {
        let capacity_hint = std::env::var(format!("{prefix}_CAPACITY"))
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_CAPACITY);
        Self { capacity_hint }
    }

    /// Creates an empty unsynchronized deque.
    #[must_use]
    pub fn build<T>(self) -> IndexableDeque<T> {
        IndexableDeque::from_config(self)
    }

    /// Creates an unsynchronized deque holding `elements`.
    ///
    /// The buffer is sized for the larger of the hint and the element count.
    #[must_use]
    pub fn build_from<T, I>(self, elements: I) -> IndexableDeque<T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut deque = self.build();
        deque.extend(elements);
        deque
    }

    /// Creates an empty synced deque.
    #[cfg(feature = "sync")]
    #[must_use]
    pub fn build_shared<T>(self) -> SharedDeque<T> {
        SharedDeque::from_deque(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_default_capacity() {
        let deque: IndexableDeque<u8> = DequeConfig::default().build();
        assert_eq!(deque.capacity(), DEFAULT_CAPACITY);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(100, 100)]
    fn test_capacity_hint(#[case] hint: usize, #[case] expected: usize) {
        let deque: IndexableDeque<u8> = DequeConfig::new().capacity(hint).build();
        assert_eq!(deque.capacity(), expected);
    }

    #[rstest]
    fn test_build_from_keeps_order() {
        let deque = DequeConfig::new().capacity(2).build_from(1..=5);
        assert_eq!(deque.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_from_env_falls_back_on_missing_variable() {
        let config = DequeConfig::from_env("INDEXABLE_DEQUE_TEST_UNSET_PREFIX");
        assert_eq!(config, DequeConfig::new());
    }

    #[cfg(feature = "sync")]
    #[rstest]
    fn test_build_shared_is_synced() {
        let shared: SharedDeque<i32> = DequeConfig::new().build_shared();
        assert!(shared.is_synced());
    }
}
