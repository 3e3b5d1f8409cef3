//! The client session use case.
//!
//! [`ClientSession`] ties the pieces together: it performs the single connect
//! attempt, spawns the read loop and (when enabled) the heartbeat task, and
//! exposes the command, shutdown, and event-channel surfaces to the caller.
//!
//! # Lifecycle
//!
//! ```text
//! ClientSession::connect(&config)
//!  ├─ CameraConnection::connect()   -- status event (Connected/Disconnected)
//!  ├─ spawn read loop               -- Line events, then Closed(reason)
//!  └─ spawn heartbeat (optional)    -- HeartbeatStopped(reason) on exit
//!
//! shutdown()                        -- flips the watch flag both loops
//!                                      select on, then closes the socket
//! ```
//!
//! There is no reconnect path: one session is one connection, and a closed
//! session stays closed.

use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::config::ClientConfig;
use crate::domain::event::ClientEvent;
use crate::infrastructure::heartbeat::run_heartbeat;
use crate::infrastructure::network::{read_loop, CameraConnection, ClientNetworkError};

/// Capacity of the bounded event channel. Line delivery applies backpressure
/// to the read loop once the consumer falls this far behind.
const EVENT_CHANNEL_CAPACITY: usize = 128;

/// One established control-channel session.
pub struct ClientSession {
    connection: CameraConnection,
    shutdown_tx: watch::Sender<bool>,
    read_task: JoinHandle<()>,
    heartbeat_task: Option<JoinHandle<()>>,
}

impl ClientSession {
    /// Performs the single connect attempt and starts the session loops.
    ///
    /// The event receiver is returned in **both** outcomes so the status
    /// event is always observable:
    ///
    /// - On success the receiver yields `Connected` first, then `Line`
    ///   events in arrival order, then exactly one `Closed(reason)`.
    /// - On failure it yields `Disconnected` exactly once and then ends; the
    ///   typed error is also returned and no loop is started.
    pub async fn connect(
        config: &ClientConfig,
    ) -> (
        mpsc::Receiver<ClientEvent>,
        Result<Self, ClientNetworkError>,
    ) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let (connection, read_half) =
            match CameraConnection::connect(&config.endpoint(), &events_tx).await {
                Ok(parts) => parts,
                // The Disconnected event is already on the channel; dropping
                // the sender here ends the channel right after it.
                Err(e) => return (events_rx, Err(e)),
            };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Read loop task: runs until EOF, error, or cancellation, then
        // reports why and releases the socket.
        let read_task = {
            let events_tx = events_tx.clone();
            let writer = connection.writer();
            let shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move {
                let reason = read_loop(read_half, &events_tx, shutdown_rx).await;
                info!("read loop ended: {reason}");
                // The read half is dropped here; shutting the write half
                // down releases the socket on this exit path too.
                let mut writer = writer.lock().await;
                let _ = writer.shutdown().await;
                drop(writer);
                let _ = events_tx.send(ClientEvent::Closed(reason)).await;
            })
        };

        let heartbeat_task = config.heartbeat.enabled.then(|| {
            let events_tx = events_tx.clone();
            let writer = connection.writer();
            let interval = config.heartbeat.interval();
            let shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move {
                let reason = run_heartbeat(writer, interval, shutdown_rx).await;
                info!("heartbeat ended: {reason}");
                let _ = events_tx.send(ClientEvent::HeartbeatStopped(reason)).await;
            })
        });

        (
            events_rx,
            Ok(Self {
                connection,
                shutdown_tx,
                read_task,
                heartbeat_task,
            }),
        )
    }

    /// Resolved address of the controller.
    pub fn peer_addr(&self) -> SocketAddr {
        self.connection.peer_addr()
    }

    /// Sends one command line to the controller.
    ///
    /// The write races the shutdown signal, so a send stalled on a full
    /// socket buffer cannot hold the writer guard and block
    /// [`shutdown`](Self::shutdown).
    ///
    /// # Errors
    ///
    /// Propagates the I/O error if the socket is closed or broken, and
    /// returns [`ClientNetworkError::Cancelled`] if the session shuts down
    /// before the write completes.
    pub async fn send_command(&self, text: &str) -> Result<(), ClientNetworkError> {
        let mut shutdown = self.shutdown_tx.subscribe();
        if *shutdown.borrow() {
            return Err(ClientNetworkError::Cancelled);
        }
        tokio::select! {
            result = self.connection.send_command(text) => result,
            _ = shutdown.changed() => Err(ClientNetworkError::Cancelled),
        }
    }

    /// Stops both loops and closes the socket.
    ///
    /// The read loop reports `Closed(Cancelled)` (and the heartbeat
    /// `HeartbeatStopped(Cancelled)`) on the event channel. Calling this
    /// more than once is harmless.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        self.connection.close().await;
    }

    /// Waits for the session loops to finish.
    ///
    /// Call after [`shutdown`](Self::shutdown), or after observing
    /// `Closed(..)` on the event channel.
    pub async fn join(self) {
        let _ = self.read_task.await;
        if let Some(task) = self.heartbeat_task {
            let _ = task.await;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::HeartbeatConfig;

    fn config_for(addr: std::net::SocketAddr) -> ClientConfig {
        ClientConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            heartbeat: HeartbeatConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_failed_connect_returns_error_and_single_disconnected() {
        let config = ClientConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            heartbeat: HeartbeatConfig::default(),
        };

        let (mut events, session) = ClientSession::connect(&config).await;

        assert!(session.is_err());
        assert_eq!(events.recv().await, Some(ClientEvent::Disconnected));
        // Channel must end: the failed session starts no loop and holds no
        // sender.
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn test_connected_event_precedes_lines() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = config_for(addr);

        let server = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(b"start\n").await.unwrap();
        });

        let (mut events, session) = ClientSession::connect(&config).await;
        let session = session.expect("connect must succeed");

        assert_eq!(
            events.recv().await,
            Some(ClientEvent::Connected { peer: addr })
        );
        assert_eq!(
            events.recv().await,
            Some(ClientEvent::Line("start".to_string()))
        );

        server.await.unwrap();
        session.shutdown().await;
        session.join().await;
    }
}
