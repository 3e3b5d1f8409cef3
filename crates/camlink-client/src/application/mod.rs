//! Application layer: use cases for the control-channel client.

pub mod session;

pub use session::ClientSession;
