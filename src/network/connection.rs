//! Per-connection session loop.
//!
//! Each accepted socket is split into a framed line reader driven here and a
//! writer task fed by a bounded mpsc queue. The queue's sender is what the
//! hub hands to broadcasting peers, so a stalled connection can never block
//! another session's loop.
//!
//! Session states: connected (no group), in a group (re-enterable via
//! `/join`), and closed. Teardown — leave the group, drop out of the
//! registry — runs exactly once at the single exit point of [`Connection::run`],
//! whatever path ended the loop.

use crate::config::Config;
use crate::files;
use crate::handlers::{self, SessionAction};
use crate::state::{ConnId, Hub};
use futures_util::{SinkExt, StreamExt};
use relay_proto::{Command, LineCodec, ProtocolError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One accepted client connection.
pub struct Connection {
    stream: TcpStream,
    addr: SocketAddr,
    hub: Arc<Hub>,
    config: Arc<Config>,
}

impl Connection {
    /// Wrap an accepted stream.
    pub fn new(stream: TcpStream, addr: SocketAddr, hub: Arc<Hub>, config: Arc<Config>) -> Self {
        Self {
            stream,
            addr,
            hub,
            config,
        }
    }

    /// Drive the session to completion.
    pub async fn run(self) -> anyhow::Result<()> {
        let (read_half, write_half) = self.stream.into_split();

        let (tx, rx) = mpsc::channel::<String>(self.config.limits.outbound_queue);
        let id = self.hub.register(self.addr, tx.clone());
        info!(conn = id, addr = %self.addr, "Session started");

        let writer = tokio::spawn(write_loop(write_half, rx, self.config.limits.max_line_len));

        let result = session_loop(id, read_half, tx, &self.hub, &self.config).await;

        // Teardown, exactly once for every exit path: membership and
        // registry entries go away, and dropping the hub's sender clone
        // lets the writer drain its queue and close the socket.
        self.hub.unregister(id);
        let _ = writer.await;

        result
    }
}

/// Read lines, dispatch commands, and hand off to file-receive mode.
async fn session_loop(
    id: ConnId,
    read_half: OwnedReadHalf,
    tx: mpsc::Sender<String>,
    hub: &Hub,
    config: &Config,
) -> anyhow::Result<()> {
    let codec = LineCodec::with_max_len(config.limits.max_line_len);
    let mut framed = tokio_util::codec::FramedRead::new(read_half, codec);

    while let Some(item) = framed.next().await {
        let line = match item {
            Ok(line) => line,
            Err(ProtocolError::Io(e)) => {
                debug!(conn = id, error = %e, "Read error");
                return Ok(());
            }
            Err(e) => {
                warn!(conn = id, error = %e, "Protocol error; closing session");
                return Ok(());
            }
        };

        let Some(cmd) = Command::parse(&line) else {
            continue;
        };
        debug!(conn = id, command = ?cmd, "Dispatching");

        match handlers::dispatch(hub, id, &tx, cmd).await {
            SessionAction::Continue => {}
            SessionAction::ReceiveFile(name) => {
                // The rest of the stream is file payload: drain what the
                // framer already buffered, then copy the socket to disk
                // until the peer closes. The session ends with the transfer.
                let initial: bytes::Bytes = framed.read_buffer_mut().split().freeze();
                let mut reader = framed.into_inner();

                match files::receive(&config.files.dir, &name, &initial, &mut reader).await {
                    Ok((path, bytes)) => {
                        info!(conn = id, path = %path.display(), bytes, "File received");
                    }
                    Err(e) => {
                        warn!(conn = id, name = %name, error = %e, "File receive failed");
                    }
                }
                return Ok(());
            }
        }
    }

    debug!(conn = id, "Peer closed the stream");
    Ok(())
}

/// Drain the outbound queue onto the socket. Ends when every sender is gone
/// or the first write fails; either way the session is over for this peer.
async fn write_loop(write_half: OwnedWriteHalf, mut rx: mpsc::Receiver<String>, max_line_len: usize) {
    let mut framed =
        tokio_util::codec::FramedWrite::new(write_half, LineCodec::with_max_len(max_line_len));

    while let Some(line) = rx.recv().await {
        if let Err(e) = framed.send(line).await {
            debug!(error = %e, "Write failed; stopping writer");
            break;
        }
    }
}
