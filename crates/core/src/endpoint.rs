//! The per-session tag endpoint
//!
//! A `TagEndpoint` is one client's session against one tag. It carries the
//! only piece of per-session state in the system: `last_seen`, the
//! timestamp of the newest value this session has returned to its client.
//! The file-like contract is implemented here; the cell below it knows
//! nothing about sessions.

use std::sync::Arc;

use tagfd_protocol::{TagRecord, TAG_RECORD_SIZE};

use crate::cell::{CancelToken, WaitOutcome};
use crate::error::CoreError;
use crate::registry::TagEntry;
use crate::waker::{ChangeWaker, Readiness};
use crate::Result;

/// A client session attached to one tag
#[derive(Debug)]
pub struct TagEndpoint {
    entry: Arc<TagEntry>,
    cancel: CancelToken,
    /// Timestamp of the newest value returned to this session; zero means
    /// "none yet", so a fresh session always has something to read
    last_seen: u64,
}

impl TagEndpoint {
    /// Open a session on a tag
    ///
    /// Opening never creates; it only attaches. The session starts with
    /// `last_seen = 0`, so the tag's current value is immediately readable.
    pub fn open(entry: Arc<TagEntry>) -> Self {
        let cancel = CancelToken::for_cell(entry.cell());
        Self {
            entry,
            cancel,
            last_seen: 0,
        }
    }

    /// The tag this session is attached to
    #[inline]
    pub fn entry(&self) -> &Arc<TagEntry> {
        &self.entry
    }

    /// The timestamp of the newest value this session has observed
    #[inline]
    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    /// A handle that cancels this session's blocking reads
    ///
    /// Clone it into whatever watches the client's liveness; cancelling
    /// makes a blocked [`read`] return [`CoreError::Interrupted`].
    ///
    /// [`read`]: TagEndpoint::read
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Read the newest value this session has not yet observed
    ///
    /// Blocks until such a value exists unless `nonblocking`, in which
    /// case [`CoreError::WouldBlock`] is returned instead. A cancelled
    /// wait returns [`CoreError::Interrupted`] with `last_seen` unchanged,
    /// so the client may retry cleanly.
    pub fn read(&mut self, nonblocking: bool) -> Result<TagRecord> {
        let cell = self.entry.cell();

        if cell.current_stamp() == self.last_seen {
            if nonblocking {
                return Err(CoreError::WouldBlock);
            }
            match cell.wait_for_change(self.last_seen, &self.cancel) {
                WaitOutcome::Changed => {}
                WaitOutcome::Cancelled => return Err(CoreError::Interrupted),
            }
        }

        // Timestamps only advance, so once the stamp differs from
        // last_seen it stays different; the snapshot is the newest value.
        let record = cell.snapshot();
        self.last_seen = record.timestamp;
        Ok(record)
    }

    /// Byte-level read: fill `buf` with one encoded record
    ///
    /// Fails with [`CoreError::BufferTooSmall`] before blocking if the
    /// buffer cannot hold a full record; partial records are never
    /// produced. Returns the number of bytes written.
    pub fn read_into(&mut self, buf: &mut [u8], nonblocking: bool) -> Result<usize> {
        if buf.len() < TAG_RECORD_SIZE {
            return Err(CoreError::BufferTooSmall {
                expected: TAG_RECORD_SIZE,
                actual: buf.len(),
            });
        }
        let record = self.read(nonblocking)?;
        buf[..TAG_RECORD_SIZE].copy_from_slice(&record.encode_to_array());
        Ok(TAG_RECORD_SIZE)
    }

    /// Commit a record to the tag
    ///
    /// Propagates [`CoreError::TypeMismatch`] and
    /// [`CoreError::StaleTimestamp`] from the cell; a failed write never
    /// partially mutates the tag. `last_seen` is not advanced, so a
    /// writing session still observes its own write on its next read.
    pub fn write(&self, record: &TagRecord) -> Result<()> {
        self.entry.cell().commit(record)
    }

    /// Byte-level write: decode one record from `buf` and commit it
    ///
    /// Returns the number of bytes consumed.
    pub fn write_from(&self, buf: &[u8]) -> Result<usize> {
        if buf.len() < TAG_RECORD_SIZE {
            return Err(CoreError::BufferTooSmall {
                expected: TAG_RECORD_SIZE,
                actual: buf.len(),
            });
        }
        let mut cursor = buf;
        let record = TagRecord::decode(&mut cursor)
            .map_err(|err| CoreError::from_decode(err, TAG_RECORD_SIZE))?;
        self.write(&record)?;
        Ok(TAG_RECORD_SIZE)
    }

    /// Report readiness and optionally register for the next change
    ///
    /// Readable iff this session has not observed the cell's current
    /// stamp; always writable. A registered waker is notified by the next
    /// successful commit to this tag.
    pub fn poll(&self, waker: Option<&Arc<ChangeWaker>>) -> Readiness {
        let cell = self.entry.cell();
        if let Some(waker) = waker {
            // Register before sampling so a commit landing in between is
            // seen either in the mask or as a notification, never missed.
            cell.register_waker(waker);
        }
        if cell.current_stamp() != self.last_seen {
            Readiness::READABLE
        } else {
            Readiness::WRITABLE_ONLY
        }
    }
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;
