//! Per-tag socket listener
//!
//! Each tag gets its own `UnixListener` at `<root>/<name>`. A connecting
//! client sends one mode byte: `r` opens a read session, `w` a write
//! session. One connection is one exchange session with its own
//! `last_seen` state.
//!
//! A read session is client-paced: every read is one request byte
//! (blocking or non-blocking), answered with `[status]` and, on success,
//! one full record. Pacing reads from the client side is what preserves
//! the read-latest contract end to end; values committed between two
//! requests collapse to the newest.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt, Interest};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use tagfd_core::{CoreError, TagEndpoint, TagEntry};
use tagfd_protocol::session::{MODE_READ, MODE_WRITE, READ_BLOCKING, READ_NONBLOCKING};
use tagfd_protocol::{StatusCode, TAG_RECORD_SIZE};

use crate::namespace;
use crate::Result;

/// Bind a tag's socket and start serving sessions on it
///
/// The socket is world read/write; clients are not required to be
/// privileged. The accept loop runs until the process exits.
pub(crate) async fn spawn(root: &Path, entry: Arc<TagEntry>) -> Result<()> {
    let path = namespace::tag_socket_path(root, entry.name());
    namespace::remove_stale(&path)?;

    let listener = UnixListener::bind(&path)?;
    namespace::set_socket_mode(&path, namespace::TAG_SOCKET_MODE)?;

    info!(tag = entry.name(), path = %path.display(), "tag endpoint listening");
    tokio::spawn(accept_loop(listener, entry));
    Ok(())
}

async fn accept_loop(listener: UnixListener, entry: Arc<TagEntry>) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let entry = Arc::clone(&entry);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, entry).await {
                        debug!(error = %e, "tag client connection ended");
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "failed to accept tag connection");
            }
        }
    }
}

/// Dispatch a fresh connection by its mode byte
async fn handle_connection(mut stream: UnixStream, entry: Arc<TagEntry>) -> Result<()> {
    let mut mode = [0u8; 1];
    stream.read_exact(&mut mode).await?;

    let endpoint = TagEndpoint::open(Arc::clone(&entry));
    debug!(tag = entry.name(), mode = %(mode[0] as char), "tag session opened");

    match mode[0] {
        MODE_READ => handle_reader(stream, endpoint).await,
        MODE_WRITE => handle_writer(stream, endpoint).await,
        other => {
            warn!(tag = entry.name(), mode = other, "unknown session mode");
            stream
                .write_all(&[StatusCode::TransferFault.as_u8()])
                .await?;
            Ok(())
        }
    }
}

/// Read session: one request byte in, `[status][record]` out
///
/// Blocking reads run on the blocking pool. While one is in flight the
/// client is supposed to stay silent, so any readability on the socket
/// means disconnect (or a protocol violation); either cancels the
/// in-flight read instead of leaving a dead thread parked on the cell.
async fn handle_reader(mut stream: UnixStream, mut endpoint: TagEndpoint) -> Result<()> {
    let mut request = [0u8; 1];

    loop {
        match stream.read_exact(&mut request).await {
            Ok(_) => {}
            // Clean disconnect between requests.
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        let read = match request[0] {
            READ_NONBLOCKING => endpoint.read(true),
            READ_BLOCKING => {
                let cancel = endpoint.cancel_token();
                let mut blocking = tokio::task::spawn_blocking(move || {
                    let read = endpoint.read(false);
                    (endpoint, read)
                });

                let joined = tokio::select! {
                    joined = &mut blocking => joined?,
                    _ = stream.ready(Interest::READABLE) => {
                        cancel.cancel();
                        blocking.await?
                    }
                };
                endpoint = joined.0;
                joined.1
            }
            other => {
                warn!(request = other, "unknown read request");
                stream
                    .write_all(&[StatusCode::TransferFault.as_u8()])
                    .await?;
                continue;
            }
        };

        match read {
            Ok(record) => {
                let mut reply = [0u8; 1 + TAG_RECORD_SIZE];
                reply[0] = StatusCode::Ok.as_u8();
                reply[1..].copy_from_slice(&record.encode_to_array());
                stream.write_all(&reply).await?;
            }
            Err(CoreError::WouldBlock) => {
                stream
                    .write_all(&[StatusCode::WouldBlock.as_u8()])
                    .await?;
            }
            // Cancelled because the client went away mid-wait.
            Err(CoreError::Interrupted) => return Ok(()),
            Err(err) => {
                warn!(error = %err, "tag read session failed");
                return Ok(());
            }
        }
    }
}

/// Write session: one full record in, one status byte out
///
/// A connection that closes between records ends the session cleanly; a
/// connection that closes mid-record is a short transfer and is answered
/// with `BufferTooSmall` on a best-effort basis. Rejected commits keep
/// the session open, matching the per-operation failure semantics.
async fn handle_writer(mut stream: UnixStream, endpoint: TagEndpoint) -> Result<()> {
    let mut buf = [0u8; TAG_RECORD_SIZE];

    loop {
        let mut filled = 0usize;
        while filled < TAG_RECORD_SIZE {
            let n = stream.read(&mut buf[filled..]).await?;
            if n == 0 {
                if filled != 0 {
                    let _ = stream
                        .write_all(&[StatusCode::BufferTooSmall.as_u8()])
                        .await;
                }
                return Ok(());
            }
            filled += n;
        }

        let status = match endpoint.write_from(&buf) {
            Ok(_) => StatusCode::Ok,
            Err(err) => {
                debug!(error = %err, "write rejected");
                err.status_code()
            }
        };
        stream.write_all(&[status.as_u8()]).await?;
    }
}
