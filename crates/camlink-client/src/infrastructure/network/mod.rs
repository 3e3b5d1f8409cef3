//! Network infrastructure for the control-channel client.
//!
//! Handles the TCP connection to the controller and turns the inbound byte
//! stream into per-line [`ClientEvent`]s.
//!
//! Architecture:
//! - [`CameraConnection`] owns the write half of the TCP stream behind a
//!   single mutex. Every outbound write — command or heartbeat — goes
//!   through that one guard, so writes can never interleave on the wire.
//! - The read half is consumed by [`read_loop`], which accumulates bytes and
//!   extracts complete lines with [`camlink_core::decode_line`].
//! - Inbound lines and the connection status are forwarded on an `mpsc`
//!   channel; the channel order *is* the delivery order.

use std::net::SocketAddr;
use std::sync::Arc;

use camlink_core::{decode_line, encode_command};
use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    sync::{mpsc, watch, Mutex},
};
use tracing::{debug, info, warn};

use crate::domain::event::{ClientEvent, CloseReason};

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// TCP connection to the controller failed.
    #[error("failed to connect to controller at {endpoint}: {source}")]
    ConnectFailed {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The session began shutting down while the write was in flight.
    #[error("session is shutting down")]
    Cancelled,
}

/// The established TCP control channel to the controller.
///
/// Owns the write half of the stream; the read half is handed to
/// [`read_loop`] at connect time. There is exactly one connect attempt per
/// `CameraConnection` — no reconnect path exists.
pub struct CameraConnection {
    /// Single writer guard shared by the command path and the heartbeat path.
    writer: Arc<Mutex<OwnedWriteHalf>>,
    peer_addr: SocketAddr,
}

impl CameraConnection {
    /// Connects to the controller at `endpoint` (`host:port`).
    ///
    /// Emits the status event on `events` in both outcomes, before
    /// returning: [`ClientEvent::Connected`] on success,
    /// [`ClientEvent::Disconnected`] on failure. The status event therefore
    /// always precedes any [`ClientEvent::Line`] from the read loop, which
    /// is only started afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ClientNetworkError::ConnectFailed`] if the TCP connection
    /// cannot be established. The connection is not usable after a failure.
    pub async fn connect(
        endpoint: &str,
        events: &mpsc::Sender<ClientEvent>,
    ) -> Result<(Self, OwnedReadHalf), ClientNetworkError> {
        let stream = match TcpStream::connect(endpoint).await {
            Ok(stream) => stream,
            Err(source) => {
                warn!("could not connect to controller at {endpoint}: {source}");
                let _ = events.send(ClientEvent::Disconnected).await;
                return Err(ClientNetworkError::ConnectFailed {
                    endpoint: endpoint.to_string(),
                    source,
                });
            }
        };

        let peer_addr = match stream.peer_addr() {
            Ok(addr) => addr,
            Err(source) => {
                let _ = events.send(ClientEvent::Disconnected).await;
                return Err(ClientNetworkError::ConnectFailed {
                    endpoint: endpoint.to_string(),
                    source,
                });
            }
        };

        info!("connected to controller at {peer_addr}");
        let _ = events.send(ClientEvent::Connected { peer: peer_addr }).await;

        // Split into independent read and write halves so the read loop and
        // the writers can live in separate tasks without shared ownership.
        let (read_half, write_half) = stream.into_split();

        Ok((
            Self {
                writer: Arc::new(Mutex::new(write_half)),
                peer_addr,
            },
            read_half,
        ))
    }

    /// Resolved address of the controller.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// The shared writer guard, for the heartbeat task.
    pub fn writer(&self) -> Arc<Mutex<OwnedWriteHalf>> {
        Arc::clone(&self.writer)
    }

    /// Writes one command line (`text` + terminator) and flushes.
    ///
    /// Concurrent callers serialize on the writer guard — the second caller
    /// blocks until the first write completes, with no fairness guarantee.
    ///
    /// # Errors
    ///
    /// Propagates the I/O error if the socket is closed or broken.
    pub async fn send_command(&self, text: &str) -> Result<(), ClientNetworkError> {
        let bytes = encode_command(text);
        let mut writer = self.writer.lock().await;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Shuts down the outbound half of the socket.
    ///
    /// Called on every session exit path; a second call on an already-closed
    /// socket is harmless.
    pub async fn close(&self) {
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            debug!("socket shutdown on close: {e}");
        }
    }
}

// ── Read loop ─────────────────────────────────────────────────────────────────

/// Reads lines from the control channel until the stream ends.
///
/// Accumulates socket bytes in a streaming buffer and emits one
/// [`ClientEvent::Line`] per complete line, in order. Returns the
/// termination reason:
///
/// - [`CloseReason::EndOfStream`] — the peer closed the stream. A final
///   unterminated line, if any, is delivered first.
/// - [`CloseReason::Io`] — a read error; logged and reported, not swallowed.
/// - [`CloseReason::Cancelled`] — the shutdown flag flipped, or the event
///   consumer dropped the channel.
///
/// The caller wraps this in a task, reports the returned reason as a
/// [`ClientEvent::Closed`], and releases the socket.
pub async fn read_loop(
    mut reader: OwnedReadHalf,
    events: &mpsc::Sender<ClientEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> CloseReason {
    // Streaming receive buffer — accumulates bytes across read() calls. No
    // maximum line length is enforced; an unbounded line buffers entirely
    // here before delivery.
    let mut recv_buf: Vec<u8> = Vec::with_capacity(4096);
    let mut read_tmp = vec![0u8; 4096];

    loop {
        let n = tokio::select! {
            result = reader.read(&mut read_tmp) => match result {
                Ok(0) => {
                    // EOF. Flush a final line the peer never terminated.
                    debug!("controller closed the control channel (EOF)");
                    while let Some((line, consumed)) = decode_line(&recv_buf, true) {
                        recv_buf.drain(..consumed);
                        if events.send(ClientEvent::Line(line)).await.is_err() {
                            return CloseReason::Cancelled;
                        }
                    }
                    return CloseReason::EndOfStream;
                }
                Ok(n) => n,
                Err(e) => {
                    warn!("read error on control channel: {e}");
                    return CloseReason::Io(e.to_string());
                }
            },
            // Either the shutdown flag flipped or the session went away;
            // both mean stop.
            _ = shutdown.changed() => return CloseReason::Cancelled,
        };

        recv_buf.extend_from_slice(&read_tmp[..n]);

        // A single read() may have delivered several complete lines at once.
        while let Some((line, consumed)) = decode_line(&recv_buf, false) {
            recv_buf.drain(..consumed);
            if events.send(ClientEvent::Line(line)).await.is_err() {
                debug!("event channel closed; exiting read loop");
                return CloseReason::Cancelled;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_failure_emits_disconnected_and_typed_error() {
        // Port 1 is unassigned on a dev machine; the connect is refused
        // immediately rather than timing out.
        let (tx, mut rx) = mpsc::channel(8);

        let result = CameraConnection::connect("127.0.0.1:1", &tx).await;

        assert!(matches!(
            result,
            Err(ClientNetworkError::ConnectFailed { .. })
        ));
        assert_eq!(rx.recv().await, Some(ClientEvent::Disconnected));
    }

    #[tokio::test]
    async fn test_connect_success_emits_connected_with_peer_addr() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, mut rx) = mpsc::channel(8);

        let (conn, _read_half) = CameraConnection::connect(&addr.to_string(), &tx)
            .await
            .expect("connect to local listener must succeed");

        assert_eq!(rx.recv().await, Some(ClientEvent::Connected { peer: addr }));
        assert_eq!(conn.peer_addr(), addr);
    }

    #[tokio::test]
    async fn test_send_command_writes_terminated_line() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, _rx) = mpsc::channel(8);

        let (conn, _read_half) = CameraConnection::connect(&addr.to_string(), &tx)
            .await
            .unwrap();
        let (mut server, _) = listener.accept().await.unwrap();

        conn.send_command("start").await.unwrap();

        let mut buf = vec![0u8; 16];
        let n = server.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"start\n");
    }
}
