//! Tag read and write sessions
//!
//! A `TagReader` is one read session: each `read` blocks until the tag
//! holds a value this session has not yet observed, then returns it.
//! Values committed while the reader is busy collapse to the newest one.
//! A `TagWriter` submits fully-formed records and surfaces the exchange's
//! verdict per record.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use tagfd_protocol::paths::tag_endpoint_path;
use tagfd_protocol::session::{MODE_READ, MODE_WRITE, READ_BLOCKING, READ_NONBLOCKING};
use tagfd_protocol::{StatusCode, TagRecord, TAG_RECORD_SIZE};

use crate::error::ClientError;
use crate::Result;

fn connect(root: &Path, name: &str, mode: u8) -> Result<UnixStream> {
    let mut stream = UnixStream::connect(tag_endpoint_path(root, name))?;
    stream.write_all(&[mode])?;
    Ok(stream)
}

/// A blocking read session on one tag
#[derive(Debug)]
pub struct TagReader {
    stream: UnixStream,
    name: String,
}

impl TagReader {
    /// Open a read session on `<root>/<name>`
    ///
    /// Opening never creates a tag; connecting to a name that does not
    /// exist fails with an I/O error.
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        Ok(Self {
            stream: connect(root, name, MODE_READ)?,
            name: name.to_string(),
        })
    }

    /// The tag this session reads
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until an unobserved value exists, then return it
    pub fn read(&mut self) -> Result<TagRecord> {
        match self.request(READ_BLOCKING)? {
            Some(record) => Ok(record),
            // The endpoint never answers WouldBlock to a blocking read.
            None => Err(ClientError::Rejected(StatusCode::WouldBlock)),
        }
    }

    /// Return the unobserved value if one exists, without blocking
    pub fn try_read(&mut self) -> Result<Option<TagRecord>> {
        self.request(READ_NONBLOCKING)
    }

    /// Bound how long [`read`] may block
    ///
    /// `None` restores indefinite blocking. A timed-out read surfaces as
    /// an I/O error with kind `WouldBlock` or `TimedOut`; the session's
    /// reply stream is then out of step and the reader should be
    /// reopened. [`try_read`] polls without that hazard.
    ///
    /// [`read`]: TagReader::read
    /// [`try_read`]: TagReader::try_read
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    fn request(&mut self, kind: u8) -> Result<Option<TagRecord>> {
        self.stream.write_all(&[kind])?;

        let mut status = [0u8; 1];
        self.stream.read_exact(&mut status)?;
        match StatusCode::from_u8(status[0])? {
            StatusCode::Ok => {
                let mut buf = [0u8; TAG_RECORD_SIZE];
                self.stream.read_exact(&mut buf)?;
                Ok(Some(TagRecord::decode(&mut &buf[..])?))
            }
            StatusCode::WouldBlock => Ok(None),
            code => Err(ClientError::Rejected(code)),
        }
    }
}

/// A write session on one tag
#[derive(Debug)]
pub struct TagWriter {
    stream: UnixStream,
    name: String,
}

impl TagWriter {
    /// Open a write session on `<root>/<name>`
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        Ok(Self {
            stream: connect(root, name, MODE_WRITE)?,
            name: name.to_string(),
        })
    }

    /// The tag this session writes
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit one record and wait for the exchange's verdict
    ///
    /// A rejected record (wrong type, stale timestamp) leaves the tag
    /// untouched and the session usable.
    pub fn write(&mut self, record: &TagRecord) -> Result<()> {
        self.stream.write_all(&record.encode_to_array())?;

        let mut status = [0u8; 1];
        self.stream.read_exact(&mut status)?;
        match StatusCode::from_u8(status[0])? {
            StatusCode::Ok => Ok(()),
            code => Err(ClientError::Rejected(code)),
        }
    }
}
