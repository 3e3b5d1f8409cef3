//! Infrastructure layer: the TCP control channel and the heartbeat task.

pub mod heartbeat;
pub mod network;

pub use heartbeat::run_heartbeat;
pub use network::{read_loop, CameraConnection, ClientNetworkError};
