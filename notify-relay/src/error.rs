//! Error types for relay operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Port {port} is already in use. Another notification server may already be running.")]
    PortInUse { port: u16 },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Failed to load policy from {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse policy: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Timed out after {secs}s waiting for the relay")]
    Timeout { secs: u64 },

    #[error("Unexpected response from relay: {0:?}")]
    UnexpectedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
