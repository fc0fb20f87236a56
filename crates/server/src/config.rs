//! Server configuration
//!
//! # Example
//!
//! ```toml
//! root = "/run/tagfd"
//! max_tags = 64
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use tagfd_core::DEFAULT_MAX_TAGS;

/// Default namespace root directory
pub const DEFAULT_ROOT: &str = "/run/tagfd";

/// Configuration for the namespace daemon
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory holding one socket per tag; the master socket is the
    /// sibling path `<root>.master`
    pub root: PathBuf,

    /// Maximum number of live tags
    /// Default: 64
    pub max_tags: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            max_tags: DEFAULT_MAX_TAGS,
        }
    }
}

impl ServerConfig {
    /// Set the namespace root directory
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    /// Set the registry capacity
    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }
}
