//! The namespace daemon
//!
//! `TagfdServer` ties a core engine to a socket namespace: on start it
//! exposes every already-registered tag and the master endpoint, and each
//! tag created through the master endpoint appears in the namespace
//! before its creation is acknowledged.

use std::sync::Arc;

use tracing::info;

use tagfd_core::Core;

use crate::config::ServerConfig;
use crate::master_listener;
use crate::namespace;
use crate::tag_listener;
use crate::Result;

/// Unix socket namespace server for a tag exchange core
pub struct TagfdServer {
    core: Arc<Core>,
    config: ServerConfig,
}

impl TagfdServer {
    /// Create a server for an existing core
    pub fn new(core: Arc<Core>, config: ServerConfig) -> Self {
        Self { core, config }
    }

    /// Create a server with a fresh core sized from the configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let core = Core::new(config.max_tags);
        Self::new(core, config)
    }

    /// The underlying exchange engine
    pub fn core(&self) -> &Arc<Core> {
        &self.core
    }

    /// The server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        namespace::ensure_root(&self.config.root)?;

        for entry in self.core.tags() {
            tag_listener::spawn(&self.config.root, entry).await?;
        }

        info!(
            root = %self.config.root.display(),
            max_tags = self.config.max_tags,
            tags = self.core.registry().len(),
            "tagfd namespace up"
        );

        master_listener::run(Arc::clone(&self.core), self.config.clone()).await
    }

    /// Start the server in a background task
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
