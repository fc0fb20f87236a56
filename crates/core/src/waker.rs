//! Readiness reporting and poll wakers
//!
//! A session that wants event-driven polling registers a `ChangeWaker` on
//! a cell; the next successful commit to that cell notifies the waker. One
//! waker can be registered on many cells, which is how a client watches a
//! whole set of tags with a single blocking wait.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Readiness of a tag session, as reported by poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// The session has not yet observed the cell's current value
    pub readable: bool,
    /// Always set; a tag can be written at any time
    pub writable: bool,
}

impl Readiness {
    /// Readiness with an unseen value available
    pub const READABLE: Self = Self {
        readable: true,
        writable: true,
    };

    /// Readiness with nothing new to read
    pub const WRITABLE_ONLY: Self = Self {
        readable: false,
        writable: true,
    };
}

/// A latching notification handle fired by cell commits
///
/// The latch stays set until consumed by a wait, so a commit that lands
/// just before the poller blocks is never lost.
#[derive(Debug, Default)]
pub struct ChangeWaker {
    ready: Mutex<bool>,
    cv: Condvar,
}

impl ChangeWaker {
    /// Create a waker, ready to be registered on cells
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Latch the waker and wake anyone blocked in [`wait`]
    ///
    /// [`wait`]: ChangeWaker::wait
    pub fn notify(&self) {
        let mut ready = self.ready.lock();
        *ready = true;
        self.cv.notify_all();
    }

    /// Block until notified, then reset the latch
    pub fn wait(&self) {
        let mut ready = self.ready.lock();
        while !*ready {
            self.cv.wait(&mut ready);
        }
        *ready = false;
    }

    /// Block until notified or until the timeout elapses
    ///
    /// Returns `true` if a notification was consumed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        let mut ready = self.ready.lock();
        while !*ready {
            if self.cv.wait_until(&mut ready, deadline).timed_out() {
                return false;
            }
        }
        *ready = false;
        true
    }

    /// Consume a pending notification without blocking
    ///
    /// Returns `true` if the latch was set.
    pub fn take_notified(&self) -> bool {
        let mut ready = self.ready.lock();
        std::mem::take(&mut *ready)
    }
}

#[cfg(test)]
#[path = "waker_test.rs"]
mod tests;
