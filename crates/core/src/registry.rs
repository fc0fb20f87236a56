//! The tag registry
//!
//! The process-wide set of live tags: append-only, bounded by a capacity
//! fixed at construction, keyed by unique name. Creation is serialized by
//! the master endpoint's exclusivity; lookups and enumeration may race a
//! creation and see either the pre-append or the post-publish state,
//! never a half-installed tag: an entry is pushed only once its cell is
//! fully constructed.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

use tagfd_protocol::{validate_tag_name, DataType, ProtocolError, TagRecord};

use crate::cell::TagCell;
use crate::error::CoreError;
use crate::Result;

/// Current wall-clock time in milliseconds since the Unix epoch
pub(crate) fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Stable identity of a live tag, assigned at creation
///
/// Identities are dense, start at zero, and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    /// The raw index value
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One live tag: its identity, name and value cell
#[derive(Debug)]
pub struct TagEntry {
    id: TagId,
    name: String,
    cell: Arc<TagCell>,
}

impl TagEntry {
    /// The tag's stable identity
    #[inline]
    pub fn id(&self) -> TagId {
        self.id
    }

    /// The tag's name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag's value cell
    #[inline]
    pub fn cell(&self) -> &Arc<TagCell> {
        &self.cell
    }

    /// The tag's data type (immutable after creation)
    pub fn dtype(&self) -> DataType {
        self.cell.snapshot().dtype()
    }
}

/// The process-wide collection of live tags
#[derive(Debug)]
pub struct TagRegistry {
    tags: RwLock<Vec<Arc<TagEntry>>>,
    capacity: usize,
}

impl TagRegistry {
    /// Create an empty registry bounded by `capacity` tags
    pub fn new(capacity: usize) -> Self {
        Self {
            tags: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// The configured maximum number of tags
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live tags
    pub fn len(&self) -> usize {
        self.tags.read().len()
    }

    /// Check whether no tags exist yet
    pub fn is_empty(&self) -> bool {
        self.tags.read().is_empty()
    }

    /// Create a tag
    ///
    /// Crate-private so that creation is only reachable through the
    /// exclusive master endpoint; the registry itself never interleaves
    /// two creations.
    ///
    /// Validation order is part of the contract: empty name, over-long
    /// name, illegal character, unknown data type, capacity, then name
    /// uniqueness. The first violated condition is returned and nothing is
    /// installed. On success the new tag starts with a zeroed payload,
    /// UNCERTAIN quality and the current wall-clock stamp.
    pub(crate) fn create(&self, dtype: DataType, name: &str) -> Result<Arc<TagEntry>> {
        validate_tag_name(name).map_err(|err| match err {
            ProtocolError::InvalidName { reason } => CoreError::NameInvalid { reason },
            _ => CoreError::NameInvalid {
                reason: "invalid name",
            },
        })?;
        if !dtype.is_creatable() {
            return Err(CoreError::DtypeInvalid(dtype.as_u8()));
        }

        let mut tags = self.tags.write();
        if tags.len() >= self.capacity {
            return Err(CoreError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        if tags.iter().any(|tag| tag.name == name) {
            return Err(CoreError::NameTaken {
                name: name.to_string(),
            });
        }
        tags.try_reserve(1).map_err(|_| CoreError::OutOfMemory)?;

        let record = TagRecord::initial(dtype, now_millis()).expect("dtype checked creatable");
        let entry = Arc::new(TagEntry {
            id: TagId(tags.len() as u32),
            name: name.to_string(),
            cell: Arc::new(TagCell::new(record)),
        });
        tags.push(Arc::clone(&entry));

        info!(name, %dtype, id = %entry.id, "tag created");
        Ok(entry)
    }

    /// Look up a tag by name
    pub fn lookup(&self, name: &str) -> Option<Arc<TagEntry>> {
        self.tags.read().iter().find(|tag| tag.name == name).cloned()
    }

    /// Snapshot of all live tags in creation order
    pub fn entries(&self) -> Vec<Arc<TagEntry>> {
        self.tags.read().clone()
    }

    /// Snapshot of all live tag names in creation order
    pub fn names(&self) -> Vec<String> {
        self.tags.read().iter().map(|tag| tag.name.clone()).collect()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
