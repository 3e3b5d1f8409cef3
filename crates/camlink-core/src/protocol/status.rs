//! Reserved literals with special meaning at the protocol boundary.
//!
//! The two status literals are **synthetic**: they are fabricated locally by
//! the connection layer and handed to the caller, never read from or written
//! to the wire. Only [`HEARTBEAT_TEXT`] appears on the wire (followed by a
//! line terminator), and only when the heartbeat sender is enabled.

/// Synthetic status value reported once after a successful connect.
pub const STATUS_CONNECT: &str = "connect";

/// Synthetic status value reported once after a failed connect.
pub const STATUS_DISCONNECT: &str = "disconnect";

/// Fixed keep-alive text written by the heartbeat sender.
pub const HEARTBEAT_TEXT: &str = "heart";

/// Default interval between heartbeat lines, in milliseconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 2000;
