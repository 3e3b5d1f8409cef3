//! Domain layer: pure types with no I/O dependencies.

pub mod config;
pub mod event;

pub use config::{ClientConfig, ConfigError, HeartbeatConfig};
pub use event::{ClientEvent, CloseReason};
