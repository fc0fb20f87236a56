//! The master endpoint
//!
//! Tag creation flows through a single exclusive channel. Exclusivity is
//! one atomic flag rather than a lock: opening test-and-sets it, dropping
//! the endpoint clears it unconditionally, so a crashed holder can never
//! wedge the channel. The master endpoint has no read surface.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use tagfd_protocol::{CreateRequest, CREATE_REQUEST_SIZE};

use crate::context::Core;
use crate::error::CoreError;
use crate::registry::TagEntry;
use crate::Result;

/// The single administrative session installing new tags
///
/// Obtained through [`Core::open_admin`]; at most one exists at a time.
/// Dropping it frees the channel for the next opener.
#[derive(Debug)]
pub struct AdminEndpoint {
    core: Arc<Core>,
}

impl AdminEndpoint {
    /// Atomically claim the master channel
    ///
    /// Fails with [`CoreError::AdminBusy`] if another session holds it;
    /// the flag is untouched in that case.
    pub(crate) fn open(core: Arc<Core>) -> Result<Self> {
        if core
            .admin_in_use
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            warn!("master endpoint open rejected: already held");
            return Err(CoreError::AdminBusy);
        }
        debug!("master endpoint opened");
        Ok(Self { core })
    }

    /// Create a tag from an already-decoded request
    pub fn create(&self, request: &CreateRequest) -> Result<Arc<TagEntry>> {
        self.core.registry().create(request.dtype, &request.name)
    }

    /// Byte-level write: decode one creation record and install the tag
    ///
    /// The record must be complete; short writes are rejected before any
    /// validation. Returns the number of bytes consumed.
    pub fn write_from(&self, buf: &[u8]) -> Result<usize> {
        if buf.len() < CREATE_REQUEST_SIZE {
            return Err(CoreError::BufferTooSmall {
                expected: CREATE_REQUEST_SIZE,
                actual: buf.len(),
            });
        }
        let mut cursor = buf;
        let request = CreateRequest::decode(&mut cursor)
            .map_err(|err| CoreError::from_decode(err, CREATE_REQUEST_SIZE))?;
        self.create(&request)?;
        Ok(CREATE_REQUEST_SIZE)
    }
}

impl Drop for AdminEndpoint {
    fn drop(&mut self) {
        // Unconditional clear: FREE is always reachable from BUSY.
        self.core.admin_in_use.store(false, Ordering::Release);
        debug!("master endpoint released");
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
