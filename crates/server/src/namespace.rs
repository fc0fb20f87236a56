//! Namespace filesystem handling
//!
//! Path layout comes from `tagfd_protocol::paths`; this module owns the
//! filesystem side: creating the root, clearing stale sockets from a
//! previous run, and applying the permission convention. Tag sockets are
//! world read/write so unprivileged clients can exchange values; creating
//! tags requires access to the owner-only master socket.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

pub(crate) use tagfd_protocol::paths::{
    master_endpoint_path as master_socket_path, tag_endpoint_path as tag_socket_path,
};

use crate::Result;

/// File mode of tag sockets: world read/write
pub const TAG_SOCKET_MODE: u32 = 0o666;

/// File mode of the master socket: owner-only
pub const MASTER_SOCKET_MODE: u32 = 0o600;

/// Create the namespace root directory if it does not exist
pub fn ensure_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root)?;
    Ok(())
}

/// Remove a stale socket file left behind by a previous run
pub fn remove_stale(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Apply a file mode to a bound socket
pub fn set_socket_mode(path: &Path, mode: u32) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}
