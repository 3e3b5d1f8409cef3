//! Camlink control-channel client — entry point.
//!
//! Connects to the controller, prints the connection status and every
//! received line to stdout, and forwards each line typed on stdin as a
//! command. This is the interactive stand-in for the camera application that
//! embeds the library.
//!
//! # Usage
//!
//! ```text
//! camlink-client [OPTIONS]
//!
//! Options:
//!   --config <FILE>               TOML config file
//!   --host <HOST>                 Controller hostname or IP [default: 127.0.0.1]
//!   --port <PORT>                 Controller TCP port [default: 9000]
//!   --heartbeat                   Enable the periodic keep-alive line
//!   --heartbeat-interval-ms <MS>  Keep-alive interval [default: 2000]
//! ```
//!
//! CLI flags override config-file values; both override the defaults. The
//! flags can also be set through `CAMLINK_*` environment variables.
//!
//! # Output convention
//!
//! The connection status is printed as the reserved literals `connect` /
//! `disconnect`, and each received line is printed verbatim — the same
//! values the embedding application's callback dispatches on. Diagnostics go
//! to stderr via `tracing`, keeping stdout parseable.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use camlink_client::domain::config::ClientConfig;
use camlink_client::domain::event::ClientEvent;
use camlink_client::ClientSession;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Camlink control-channel client.
///
/// Dials the controller over plain TCP and speaks the newline-delimited text
/// protocol: one line in is one event, one line out is one command.
#[derive(Debug, Parser)]
#[command(
    name = "camlink-client",
    about = "Line-oriented TCP control client for a remote-operated camera",
    version
)]
struct Cli {
    /// TOML config file. Missing fields fall back to defaults.
    #[arg(long, env = "CAMLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Controller hostname or IP address.
    #[arg(long, env = "CAMLINK_HOST")]
    host: Option<String>,

    /// Controller TCP port.
    #[arg(long, env = "CAMLINK_PORT")]
    port: Option<u16>,

    /// Enable the periodic keep-alive line (off by default).
    #[arg(long, env = "CAMLINK_HEARTBEAT")]
    heartbeat: bool,

    /// Keep-alive interval in milliseconds.
    #[arg(long, env = "CAMLINK_HEARTBEAT_INTERVAL_MS")]
    heartbeat_interval_ms: Option<u64>,
}

impl Cli {
    /// Resolves the layered configuration: defaults, then the config file,
    /// then CLI flags.
    fn into_client_config(self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("loading config file {}", path.display()))?,
            None => ClientConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.heartbeat {
            config.heartbeat.enabled = true;
        }
        if let Some(interval_ms) = self.heartbeat_interval_ms {
            config.heartbeat.interval_ms = interval_ms;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (stderr, so stdout stays protocol-clean).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_client_config()?;
    info!("connecting to controller at {}", config.endpoint());

    let (mut events, session) = ClientSession::connect(&config).await;
    let session = match session {
        Ok(session) => session,
        Err(e) => {
            // Surface the status event the embedding application would see.
            while let Some(event) = events.recv().await {
                if let Some(status) = event.status_text() {
                    println!("{status}");
                }
            }
            return Err(e).context("could not establish control channel");
        }
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdin_lines = stdin.lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            maybe_event = events.recv() => match maybe_event {
                Some(event) => {
                    if let Some(status) = event.status_text() {
                        println!("{status}");
                        continue;
                    }
                    match event {
                        ClientEvent::Line(line) => println!("{line}"),
                        ClientEvent::Closed(reason) => {
                            info!("control channel closed: {reason}");
                            break;
                        }
                        ClientEvent::HeartbeatStopped(reason) => {
                            warn!("heartbeat stopped: {reason}");
                        }
                        // Status events are handled above.
                        ClientEvent::Connected { .. } | ClientEvent::Disconnected => {}
                    }
                }
                None => break,
            },

            maybe_line = stdin_lines.next_line(), if stdin_open => match maybe_line {
                Ok(Some(line)) => {
                    if let Err(e) = session.send_command(&line).await {
                        error!("send failed: {e}");
                    }
                }
                Ok(None) => {
                    // stdin closed; keep receiving events.
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("stdin read error: {e}");
                    stdin_open = false;
                }
            },

            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                session.shutdown().await;
                // The read loop reports Closed(Cancelled); the loop above
                // breaks when it arrives.
            }
        }
    }

    session.shutdown().await;
    session.join().await;
    info!("camlink-client stopped");
    Ok(())
}
