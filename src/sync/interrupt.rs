//! Per-thread interruption flags.
//!
//! Every thread owns one flag. Any thread holding an [`InterruptHandle`] can
//! set it; the owning thread observes it when it next tries to acquire a
//! deque lock, which then fails with
//! [`DequeError::Cancelled`](crate::DequeError::Cancelled). The flag stays set
//! after a cancelled acquisition and is cleared only by [`interrupted`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

thread_local! {
    static FLAG: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
}

/// A sendable reference to one thread's interruption flag.
///
/// # Examples
///
/// ```rust
/// use indexable_deque::sync::interrupt::{self, InterruptHandle};
///
/// let handle = InterruptHandle::current();
/// std::thread::scope(|scope| {
///     scope.spawn(|| handle.interrupt());
/// });
/// assert!(interrupt::is_interrupted());
/// assert!(interrupt::interrupted());
/// assert!(!interrupt::is_interrupted());
/// ```
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    flag: Arc<AtomicBool>,
}

impl InterruptHandle {
    /// Returns the handle of the calling thread.
    #[must_use]
    pub fn current() -> Self {
        Self {
            flag: FLAG.with(Arc::clone),
        }
    }

    /// Sets the interruption flag.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns `true` if the flag is set.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Sets the calling thread's interruption flag.
pub fn interrupt_current() {
    FLAG.with(|flag| flag.store(true, Ordering::Release));
}

/// Returns `true` if the calling thread's flag is set, leaving it set.
#[must_use]
pub fn is_interrupted() -> bool {
    FLAG.with(|flag| flag.load(Ordering::Acquire))
}

/// Clears the calling thread's flag and returns whether it was set.
pub fn interrupted() -> bool {
    FLAG.with(|flag| flag.swap(false, Ordering::AcqRel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_flag_is_per_thread() {
        interrupt_current();
        let other = std::thread::spawn(is_interrupted).join().unwrap();
        assert!(!other);
        assert!(is_interrupted());
        assert!(interrupted());
    }

    #[rstest]
    fn test_interrupted_clears() {
        assert!(!interrupted());
        InterruptHandle::current().interrupt();
        assert!(interrupted());
        assert!(!interrupted());
    }

    #[rstest]
    fn test_handle_reaches_owner_thread() {
        let (sender, receiver) = std::sync::mpsc::channel();
        let worker = std::thread::spawn(move || {
            sender.send(InterruptHandle::current()).unwrap();
            while !is_interrupted() {
                std::thread::yield_now();
            }
            interrupted()
        });
        let handle = receiver.recv().unwrap();
        handle.interrupt();
        assert!(handle.is_interrupted());
        assert!(worker.join().unwrap());
        assert!(!is_interrupted());
    }
}
