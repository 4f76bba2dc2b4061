//! Interruptible locks.
//!
//! [`ReentrantLock`] guards a value with a reentrant mutex whose acquisition
//! can be cancelled through the calling thread's interruption flag.
//! [`NoopLock`] guards nothing and only observes the flag, which is what the
//! unsynchronized deque uses.

use std::time::Duration;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use super::interrupt;
use crate::error::DequeError;

/// How long a blocked acquisition waits before checking the interruption
/// flag again.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// A reentrant mutex with interruptible acquisition.
///
/// The owning thread may acquire the lock again while holding it; guards are
/// shared references, so mutation goes through interior mutability.
pub struct ReentrantLock<T> {
    mutex: ReentrantMutex<T>,
}

impl<T> ReentrantLock<T> {
    /// Creates an unlocked lock around `value`.
    pub fn new(value: T) -> Self {
        Self {
            mutex: ReentrantMutex::new(value),
        }
    }

    /// Acquires the lock, blocking until it is available.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, T> {
        self.mutex.lock()
    }

    /// Acquires the lock unless the calling thread is interrupted first.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the flag is set on entry or
    /// becomes set while waiting. The flag stays set.
    pub fn lock_interruptibly(&self) -> Result<ReentrantMutexGuard<'_, T>, DequeError> {
        loop {
            if interrupt::is_interrupted() {
                tracing::debug!("lock acquisition cancelled by interruption");
                return Err(DequeError::Cancelled);
            }
            if let Some(guard) = self.mutex.try_lock_for(POLL_INTERVAL) {
                return Ok(guard);
            }
        }
    }

    /// Acquires the lock only if it is free or already held by this thread.
    pub fn try_lock(&self) -> Option<ReentrantMutexGuard<'_, T>> {
        self.mutex.try_lock()
    }

    /// Returns `true` if some thread holds the lock.
    pub fn is_locked(&self) -> bool {
        self.mutex.is_locked()
    }

    /// Returns `true` if the calling thread holds the lock.
    pub fn is_owned_by_current_thread(&self) -> bool {
        self.mutex.is_owned_by_current_thread()
    }

    /// Consumes the lock and returns the guarded value.
    pub fn into_inner(self) -> T {
        self.mutex.into_inner()
    }
}

impl<T: Default> Default for ReentrantLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A lock that never blocks and only reports interruption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopLock;

impl NoopLock {
    /// Succeeds unless the calling thread is interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`DequeError::Cancelled`] if the flag is set. The flag stays
    /// set.
    pub fn lock_interruptibly(self) -> Result<(), DequeError> {
        if interrupt::is_interrupted() {
            tracing::debug!("cancelled by interruption");
            return Err(DequeError::Cancelled);
        }
        Ok(())
    }
}
