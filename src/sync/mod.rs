//! Synchronized access.
//!
//! - [`SharedDeque`]: an [`IndexableDeque`](crate::IndexableDeque) behind a
//!   reentrant, interruptible lock
//! - [`ReentrantLock`] and [`NoopLock`]: the two locking strategies
//! - [`interrupt`]: per-thread interruption flags that cancel blocked lock
//!   acquisition

pub mod interrupt;
mod lock;
mod shared;

pub use interrupt::InterruptHandle;
pub use lock::{NoopLock, ReentrantLock};
pub use shared::{SharedDeque, SharedGuard};
