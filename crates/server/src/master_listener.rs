//! The master socket
//!
//! `<root>.master` is the single channel through which tags are created.
//! The first byte a connecting client receives reports whether it won the
//! channel (`Ok`) or found it held (`AdminBusy`); a losing client is
//! disconnected immediately. The winning session then submits fixed-size
//! creation records and receives one status byte per record. Closing the
//! connection drops the core admin endpoint, which frees the channel
//! unconditionally.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use tagfd_core::{Core, CoreError};
use tagfd_protocol::{CreateRequest, StatusCode, CREATE_REQUEST_SIZE};

use crate::config::ServerConfig;
use crate::namespace;
use crate::tag_listener;
use crate::Result;

/// Bind the master socket and serve creation sessions until shutdown
pub(crate) async fn run(core: Arc<Core>, config: ServerConfig) -> Result<()> {
    let path = namespace::master_socket_path(&config.root);
    namespace::remove_stale(&path)?;

    let listener = UnixListener::bind(&path)?;
    namespace::set_socket_mode(&path, namespace::MASTER_SOCKET_MODE)?;

    info!(path = %path.display(), "master endpoint listening");

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let core = Arc::clone(&core);
                let config = config.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_session(stream, core, config).await {
                        debug!(error = %e, "master session ended");
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "failed to accept master connection");
            }
        }
    }
}

async fn handle_session(
    mut stream: UnixStream,
    core: Arc<Core>,
    config: ServerConfig,
) -> Result<()> {
    // Claim the exclusive channel before anything else; a loser learns
    // its fate from the very first byte.
    let admin = match core.open_admin() {
        Ok(admin) => admin,
        Err(err) => {
            stream.write_all(&[err.status_code().as_u8()]).await?;
            return Ok(());
        }
    };
    stream.write_all(&[StatusCode::Ok.as_u8()]).await?;
    info!("master session opened");

    let mut buf = [0u8; CREATE_REQUEST_SIZE];
    loop {
        let mut filled = 0usize;
        while filled < CREATE_REQUEST_SIZE {
            let n = stream.read(&mut buf[filled..]).await?;
            if n == 0 {
                if filled != 0 {
                    // Short creation record; reject it on the way out.
                    let _ = stream
                        .write_all(&[StatusCode::BufferTooSmall.as_u8()])
                        .await;
                }
                info!("master session closed");
                return Ok(());
            }
            filled += n;
        }

        let status = match CreateRequest::decode(&mut &buf[..]) {
            Ok(request) => match admin.create(&request) {
                Ok(entry) => {
                    // Expose the socket before acknowledging so the client
                    // can connect the moment it sees the reply.
                    match tag_listener::spawn(&config.root, entry).await {
                        Ok(()) => StatusCode::Ok,
                        Err(err) => {
                            error!(error = %err, name = %request.name, "failed to expose new tag");
                            StatusCode::TransferFault
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "tag creation rejected");
                    err.status_code()
                }
            },
            Err(err) => {
                let mapped = CoreError::from_decode(err, CREATE_REQUEST_SIZE);
                warn!(error = %mapped, "malformed creation record");
                mapped.status_code()
            }
        };
        stream.write_all(&[status.as_u8()]).await?;
    }
}
