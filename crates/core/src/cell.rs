//! The per-tag value cell
//!
//! A `TagCell` holds one tag's current record and coordinates every
//! session touching that tag: a mutex guards the record, a condition
//! variable wakes readers blocked on change, and registered poll wakers
//! are fired on every successful commit. There is no lock shared between
//! cells; two tags never contend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use tagfd_protocol::TagRecord;

use crate::error::CoreError;
use crate::waker::ChangeWaker;
use crate::Result;

/// Outcome of a blocking wait on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The stored timestamp now differs from the caller's `last_seen`
    Changed,
    /// The wait was cancelled through the session's [`CancelToken`]
    Cancelled,
}

/// Synchronization object owning one tag's current value
#[derive(Debug)]
pub struct TagCell {
    /// The stored record; the single source of truth for this tag
    stored: Mutex<TagRecord>,
    /// Signalled on every commit (and on cancellation of a waiter)
    changed: Condvar,
    /// Poll wakers to fire on the next commit; dead entries are pruned
    wakers: Mutex<Vec<Weak<ChangeWaker>>>,
}

impl TagCell {
    /// Create a cell holding the given initial record
    pub fn new(initial: TagRecord) -> Self {
        Self {
            stored: Mutex::new(initial),
            changed: Condvar::new(),
            wakers: Mutex::new(Vec::new()),
        }
    }

    /// Commit a candidate record
    ///
    /// Under the guard: rejects a candidate whose data type differs from
    /// the stored one, rejects a candidate whose timestamp does not
    /// strictly advance the stored one, otherwise overwrites the record in
    /// full. On success every blocked reader and registered waker is
    /// woken. A failed commit leaves the cell untouched.
    pub fn commit(&self, candidate: &TagRecord) -> Result<()> {
        {
            let mut stored = self.stored.lock();

            if candidate.dtype() != stored.dtype() {
                return Err(CoreError::TypeMismatch {
                    expected: stored.dtype(),
                    got: candidate.dtype(),
                });
            }
            if candidate.timestamp <= stored.timestamp {
                return Err(CoreError::StaleTimestamp {
                    current: stored.timestamp,
                    offered: candidate.timestamp,
                });
            }

            *stored = *candidate;
        }

        trace!(timestamp = candidate.timestamp, "committed value");
        self.changed.notify_all();
        self.fire_wakers();
        Ok(())
    }

    /// Full copy of the stored record
    pub fn snapshot(&self) -> TagRecord {
        *self.stored.lock()
    }

    /// The stored timestamp
    pub fn current_stamp(&self) -> u64 {
        self.stored.lock().timestamp
    }

    /// Suspend until the stored timestamp differs from `last_seen`
    ///
    /// The guard is released while suspended and reacquired to re-check.
    /// Returns [`WaitOutcome::Cancelled`] as soon as the token is
    /// cancelled; the caller's `last_seen` is untouched either way.
    pub fn wait_for_change(&self, last_seen: u64, cancel: &CancelToken) -> WaitOutcome {
        let mut stored = self.stored.lock();
        loop {
            if cancel.is_cancelled() {
                return WaitOutcome::Cancelled;
            }
            if stored.timestamp != last_seen {
                return WaitOutcome::Changed;
            }
            self.changed.wait(&mut stored);
        }
    }

    /// Register a poll waker to be fired on the next commit
    ///
    /// Registering the same waker again is a no-op, so a poll loop does
    /// not grow the list. The cell keeps only a weak reference; a dropped
    /// waker is pruned on the next commit.
    pub fn register_waker(&self, waker: &Arc<ChangeWaker>) {
        let mut wakers = self.wakers.lock();
        if wakers
            .iter()
            .any(|known| std::ptr::eq(known.as_ptr(), Arc::as_ptr(waker)))
        {
            return;
        }
        wakers.push(Arc::downgrade(waker));
    }

    /// Wake every blocked reader without committing (cancellation path)
    pub(crate) fn wake_all(&self) {
        self.changed.notify_all();
    }

    fn fire_wakers(&self) {
        let mut wakers = self.wakers.lock();
        wakers.retain(|weak| match weak.upgrade() {
            Some(waker) => {
                waker.notify();
                true
            }
            None => false,
        });
    }
}

/// Cancellation handle for one session's blocking reads
///
/// Cancelling marks the session interrupted and wakes the cell so a
/// blocked read returns promptly. The flag stays set until [`clear`] so a
/// disconnecting client cannot race back into a wait; a session that wants
/// to retry after an interruption clears it first.
///
/// [`clear`]: CancelToken::clear
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug)]
struct CancelInner {
    cancelled: AtomicBool,
    cell: Weak<TagCell>,
}

impl CancelToken {
    /// Create a token tied to the given cell
    pub(crate) fn for_cell(cell: &Arc<TagCell>) -> Self {
        Self {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                cell: Arc::downgrade(cell),
            }),
        }
    }

    /// Cancel the session's current and future blocking reads
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        if let Some(cell) = self.inner.cell.upgrade() {
            cell.wake_all();
        }
    }

    /// Check whether the token has been cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Re-arm the token so the session can block again
    pub fn clear(&self) {
        self.inner.cancelled.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod tests;
