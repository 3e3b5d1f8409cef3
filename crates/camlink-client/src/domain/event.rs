//! Events emitted by the connection layer to the application.
//!
//! All events for one connection travel over a single bounded `mpsc` channel,
//! so the consumer sees them in the order they were produced: the status
//! event first, then received lines, then a termination report.

use std::net::SocketAddr;

use camlink_core::{STATUS_CONNECT, STATUS_DISCONNECT};

/// Why a loop (read loop or heartbeat) stopped.
///
/// Every exit path is reported; nothing terminates silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed the stream (read returned EOF).
    EndOfStream,
    /// An I/O error occurred on the socket.
    Io(String),
    /// The caller asked the session to shut down, or the event consumer went
    /// away.
    Cancelled,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::EndOfStream => write!(f, "end of stream"),
            CloseReason::Io(e) => write!(f, "I/O error: {e}"),
            CloseReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One event on the connection's channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The TCP connection was established. Fires exactly once, before any
    /// [`ClientEvent::Line`].
    Connected {
        /// Resolved address of the controller we connected to.
        peer: SocketAddr,
    },
    /// The connect attempt failed. Fires exactly once; no other event follows.
    Disconnected,
    /// One received line, terminator stripped. Empty lines are delivered
    /// like any other line.
    Line(String),
    /// The read loop terminated; no further [`ClientEvent::Line`] follows.
    Closed(CloseReason),
    /// The heartbeat loop terminated.
    HeartbeatStopped(CloseReason),
}

impl ClientEvent {
    /// The reserved status literal for this event, if it is a status event.
    ///
    /// These are the `"connect"` / `"disconnect"` strings the embedding
    /// application dispatches on; the CLI prints them verbatim.
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            ClientEvent::Connected { .. } => Some(STATUS_CONNECT),
            ClientEvent::Disconnected => Some(STATUS_DISCONNECT),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_maps_reserved_literals() {
        let connected = ClientEvent::Connected {
            peer: "127.0.0.1:9000".parse().unwrap(),
        };
        assert_eq!(connected.status_text(), Some("connect"));
        assert_eq!(ClientEvent::Disconnected.status_text(), Some("disconnect"));
    }

    #[test]
    fn test_line_events_have_no_status_text() {
        // A received line that happens to spell "connect" must not be
        // mistaken for the synthetic status value.
        let line = ClientEvent::Line("connect".to_string());
        assert_eq!(line.status_text(), None);
        assert_eq!(ClientEvent::Closed(CloseReason::EndOfStream).status_text(), None);
    }

    #[test]
    fn test_close_reason_display_is_human_readable() {
        assert_eq!(CloseReason::EndOfStream.to_string(), "end of stream");
        assert_eq!(
            CloseReason::Io("broken pipe".to_string()).to_string(),
            "I/O error: broken pipe"
        );
        assert_eq!(CloseReason::Cancelled.to_string(), "cancelled");
    }
}
