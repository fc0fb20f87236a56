//! The master-endpoint client
//!
//! Holds the exclusive creation channel for as long as the value lives.
//! Opening fails immediately with `AdminBusy` if another process holds
//! the channel; dropping the client frees it.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use tagfd_protocol::paths::master_endpoint_path;
use tagfd_protocol::{CreateRequest, DataType, StatusCode};

use crate::error::ClientError;
use crate::Result;

/// An open session on the master endpoint
#[derive(Debug)]
pub struct AdminClient {
    stream: UnixStream,
}

impl AdminClient {
    /// Connect to `<root>.master` and claim the creation channel
    ///
    /// The master socket is owner-only; unprivileged processes cannot
    /// reach this far. A held channel fails with
    /// [`ClientError::Rejected`]`(AdminBusy)`.
    pub fn open(root: &Path) -> Result<Self> {
        let mut stream = UnixStream::connect(master_endpoint_path(root))?;

        let mut status = [0u8; 1];
        stream.read_exact(&mut status)?;
        match StatusCode::from_u8(status[0])? {
            StatusCode::Ok => Ok(Self { stream }),
            code => Err(ClientError::Rejected(code)),
        }
    }

    /// Create a tag
    pub fn create(&mut self, dtype: DataType, name: &str) -> Result<()> {
        self.send(&CreateRequest::new(dtype, name)?)
    }

    /// Submit an already-built creation request
    pub fn send(&mut self, request: &CreateRequest) -> Result<()> {
        self.stream.write_all(&request.encode_to_array())?;

        let mut status = [0u8; 1];
        self.stream.read_exact(&mut status)?;
        match StatusCode::from_u8(status[0])? {
            StatusCode::Ok => Ok(()),
            code => Err(ClientError::Rejected(code)),
        }
    }
}
