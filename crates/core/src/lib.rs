//! Tagfd Core - the tag registry and per-tag exchange engine
//!
//! This crate owns the set of live tags and implements the exchange
//! semantics every client sees:
//!
//! - **read-latest**: a read returns only the newest committed value and
//!   blocks until one the session has not yet observed exists
//! - **type immutability**: a tag's data type is fixed at creation
//! - **monotonic timestamps**: every commit must advance the tag's stamp
//! - **single master**: tag creation flows through one exclusive channel
//!
//! # Architecture
//!
//! ```text
//! Core
//!  ├── TagRegistry ── append-only, capacity-bounded
//!  │     └── TagEntry (name, id)
//!  │           └── TagCell ── one record + guard + change condition
//!  │                 ▲                ▲
//!  │        commit() │                │ wait_for_change()
//!  │                 │                │
//!  │           TagEndpoint      TagEndpoint      (one per client session,
//!  │           (writer)         (reader)          tracks last_seen)
//!  └── AdminEndpoint ── at most one open, installs new tags
//! ```
//!
//! Writers push a full record through an endpoint into the cell; the cell
//! wakes every blocked reader and registered poll waker; each reader copies
//! out the latest record exactly once. Intermediate values between two
//! reads of one session are lost by design.

mod admin;
mod cell;
mod context;
mod endpoint;
mod error;
mod registry;
mod waker;

pub use admin::AdminEndpoint;
pub use cell::{CancelToken, TagCell, WaitOutcome};
pub use context::Core;
pub use endpoint::TagEndpoint;
pub use error::CoreError;
pub use registry::{TagEntry, TagId, TagRegistry};
pub use waker::{ChangeWaker, Readiness};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Default registry capacity when none is configured
pub const DEFAULT_MAX_TAGS: usize = 64;
