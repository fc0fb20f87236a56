//! tagfdd - the tagfd namespace daemon
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (/run/tagfd, 64 tags)
//! tagfdd
//!
//! # Custom namespace root and capacity
//! tagfdd --root /tmp/plant --max-tags 256
//!
//! # From a config file, flags taking precedence
//! tagfdd --config /etc/tagfd.toml --log-level debug
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tagfd_server::{ServerConfig, TagfdServer};

/// tagfdd - named, typed, timestamped value exchange for process control
#[derive(Parser, Debug)]
#[command(name = "tagfdd")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Namespace root directory (tag sockets live here)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Maximum number of live tags
    #[arg(short, long)]
    max_tags: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            toml::from_str::<ServerConfig>(&raw)
                .with_context(|| format!("cannot parse config file {}", path.display()))?
        }
        None => ServerConfig::default(),
    };
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(max_tags) = cli.max_tags {
        config.max_tags = max_tags;
    }

    let server = TagfdServer::with_config(config);
    tokio::select! {
        result = server.run() => result.map_err(Into::into),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}
