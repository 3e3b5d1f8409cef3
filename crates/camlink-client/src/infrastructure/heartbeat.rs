//! Periodic keep-alive sender for the control channel.
//!
//! Writes the fixed [`HEARTBEAT_TEXT`] line at a fixed interval through the
//! same writer guard as the command path, so a heartbeat can never interleave
//! with a command on the wire.
//!
//! The feature ships disabled by default (see
//! [`HeartbeatConfig`](crate::domain::config::HeartbeatConfig)); nothing here
//! implies a keep-alive or reconnection policy beyond "write one line every
//! interval until told to stop or the write fails".

use std::sync::Arc;
use std::time::Duration;

use camlink_core::{encode_command, HEARTBEAT_TEXT};
use tokio::{
    io::AsyncWriteExt,
    net::tcp::OwnedWriteHalf,
    sync::{watch, Mutex},
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::domain::event::CloseReason;

/// Runs the heartbeat loop until a write fails or shutdown is signalled.
///
/// The first line is written immediately, then one per `interval`. Returns
/// the termination reason:
///
/// - [`CloseReason::Io`] — the loop stops after exactly one failed write
///   attempt; no retry, no further writes.
/// - [`CloseReason::Cancelled`] — the shutdown flag flipped, or the session
///   went away.
///
/// The session wraps this in a task and reports the returned reason as a
/// [`ClientEvent::HeartbeatStopped`](crate::domain::event::ClientEvent).
pub async fn run_heartbeat(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> CloseReason {
    // The ticker rejects a zero period; a configured 0 means "as fast as
    // possible", so floor it at one millisecond.
    let mut ticker = time::interval(interval.max(Duration::from_millis(1)));
    // A late tick (e.g. the writer guard was held through a slow command
    // write) must not cause a burst of catch-up heartbeats.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // The guard acquisition and the write itself both race the
                // shutdown signal: a peer that stopped reading cannot pin
                // the guard and stall the session's close().
                let beat = async {
                    let mut guard = writer.lock().await;
                    write_beat(&mut guard).await
                };
                tokio::select! {
                    result = beat => match result {
                        Ok(()) => debug!("heartbeat sent"),
                        Err(e) => {
                            warn!("heartbeat write failed, stopping sender: {e}");
                            return CloseReason::Io(e.to_string());
                        }
                    },
                    _ = shutdown.changed() => return CloseReason::Cancelled,
                }
            }
            _ = shutdown.changed() => return CloseReason::Cancelled,
        }
    }
}

/// Writes one `heart` line and flushes.
async fn write_beat(writer: &mut OwnedWriteHalf) -> std::io::Result<()> {
    writer.write_all(&encode_command(HEARTBEAT_TEXT)).await?;
    writer.flush().await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
