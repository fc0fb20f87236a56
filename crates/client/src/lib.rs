//! Tagfd Client Library
//!
//! Blocking access to a tagfd namespace for simple control and telemetry
//! processes: simulators, rules, loggers. Connects to the sockets exposed
//! by `tagfdd`.
//!
//! # Quick Start
//!
//! ```no_run
//! use tagfd_client::{AdminClient, TagReader, TagWriter, list_tags};
//! use tagfd_protocol::{DataType, Quality, TagRecord, TagValue};
//! use std::path::Path;
//!
//! let root = Path::new("/run/tagfd");
//!
//! // Create a tag through the master endpoint (privileged).
//! let mut admin = AdminClient::open(root)?;
//! admin.create(DataType::Uint32, "pump.speed")?;
//!
//! // Publish a value.
//! let mut writer = TagWriter::open(root, "pump.speed")?;
//! writer.write(&TagRecord::new(TagValue::Uint32(1450), 1_700_000_000_000, Quality::GOOD))?;
//!
//! // Consume values as they change (read-latest, blocking).
//! let mut reader = TagReader::open(root, "pump.speed")?;
//! let record = reader.read()?;
//!
//! // Discover what exists.
//! let names = list_tags(root)?;
//! # Ok::<(), tagfd_client::ClientError>(())
//! ```

mod admin;
mod error;
mod namespace;
mod tag;

pub use admin::AdminClient;
pub use error::ClientError;
pub use namespace::list_tags;
pub use tag::{TagReader, TagWriter};

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
