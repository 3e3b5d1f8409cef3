//! # camlink-core
//!
//! Shared library for Camlink containing the line-oriented wire codec and the
//! reserved control literals.
//!
//! This crate is used by the client application (and by any future peer-side
//! tooling). It has zero dependencies on OS APIs, async runtimes, or network
//! sockets.
//!
//! # Protocol overview (for beginners)
//!
//! Camlink is the control channel of a remote-operated camera recorder: a
//! controller machine sends short text commands (`start`, `end`, `back`, …)
//! to the camera device, and the device answers over the same socket. There
//! is no binary framing and no message schema — **one line of text is one
//! message**. A line ends at CR, LF, or CRLF, and the terminator is never
//! part of the message.
//!
//! This crate defines:
//!
//! - **`protocol::codec`** – How lines are extracted from the raw TCP byte
//!   stream (which has no message boundaries of its own) and how outbound
//!   commands are turned back into terminated lines.
//!
//! - **`protocol::status`** – The reserved literals with special meaning at
//!   the boundary between the connection layer and its caller (`"connect"`,
//!   `"disconnect"`) and the fixed heartbeat text sent on the wire.

pub mod protocol;

// Re-export the most-used items at the crate root so callers can write
// `camlink_core::decode_line` instead of `camlink_core::protocol::codec::decode_line`.
pub use protocol::codec::{decode_line, encode_command};
pub use protocol::status::{
    DEFAULT_HEARTBEAT_INTERVAL_MS, HEARTBEAT_TEXT, STATUS_CONNECT, STATUS_DISCONNECT,
};
