//! camlink-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! # What does camlink-client do? (for beginners)
//!
//! The *client* runs on the camera device. A controller machine elsewhere on
//! the network listens on a TCP port; the client dials out to it and keeps a
//! single long-lived connection open. Over that connection:
//!
//! 1. The controller sends text commands, one per line (`start`, `end`,
//!    `back`, `ahead`, or a numeric operator id). The client forwards each
//!    line to the application as an event.
//! 2. The application sends replies and notifications back with
//!    `send_command`, one line per call.
//! 3. Optionally, a heartbeat task writes a fixed `heart` line every two
//!    seconds so middleboxes keep the idle connection alive.
//!
//! There is deliberately no reconnect loop, no TLS, and no message schema —
//! the control channel is a single line-oriented TCP socket.

/// Application layer: the session use case tying connection, reader, and
/// heartbeat together.
pub mod application;

/// Domain layer: configuration and event types, no I/O.
pub mod domain;

/// Infrastructure layer: TCP connection and the heartbeat task.
pub mod infrastructure;

// Re-export the types nearly every caller needs.
pub use application::session::ClientSession;
pub use domain::config::ClientConfig;
pub use domain::event::{ClientEvent, CloseReason};
pub use infrastructure::network::ClientNetworkError;
