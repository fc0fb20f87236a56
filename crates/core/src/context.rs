//! The core context
//!
//! One `Core` value owns everything process-wide: the registry and the
//! master-channel flag. Hosts hold it behind an `Arc` and hand sessions
//! out from it; dropping the last reference tears the whole engine down.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::admin::AdminEndpoint;
use crate::endpoint::TagEndpoint;
use crate::error::CoreError;
use crate::registry::{TagEntry, TagRegistry};
use crate::{Result, DEFAULT_MAX_TAGS};

/// The tag exchange engine
#[derive(Debug)]
pub struct Core {
    registry: TagRegistry,
    /// FREE (`false`) / BUSY (`true`) state of the master channel
    pub(crate) admin_in_use: AtomicBool,
}

impl Core {
    /// Create an engine bounded by `max_tags` live tags
    pub fn new(max_tags: usize) -> Arc<Self> {
        Arc::new(Self {
            registry: TagRegistry::new(max_tags),
            admin_in_use: AtomicBool::new(false),
        })
    }

    /// Create an engine with the default capacity
    pub fn with_defaults() -> Arc<Self> {
        Self::new(DEFAULT_MAX_TAGS)
    }

    /// The registry of live tags
    #[inline]
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Open a session on the named tag
    ///
    /// Attaches only; unknown names fail with [`CoreError::TagNotFound`].
    pub fn open_tag(&self, name: &str) -> Result<TagEndpoint> {
        let entry = self
            .registry
            .lookup(name)
            .ok_or_else(|| CoreError::TagNotFound {
                name: name.to_string(),
            })?;
        Ok(TagEndpoint::open(entry))
    }

    /// Open the exclusive master endpoint
    pub fn open_admin(self: &Arc<Self>) -> Result<AdminEndpoint> {
        AdminEndpoint::open(Arc::clone(self))
    }

    /// Snapshot of all live tags in creation order
    pub fn tags(&self) -> Vec<Arc<TagEntry>> {
        self.registry.entries()
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
