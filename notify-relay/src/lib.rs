//! Host-side notification relay for sandboxed guests
//!
//! A guest that cannot reach the host's desktop notification facilities sends
//! one `NOTIFY|...` line over loopback TCP; the relay filters it through the
//! policy and hands it to the best native notifier the host has.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod protocol;
pub mod server;
pub mod sink;

// Re-export commonly used types
pub use config::{PolicyConfig, PolicyLoader, PolicyOverrides};
pub use error::{RelayError, Result};
pub use filter::{Decision, PolicyEngine};
pub use protocol::{parse_request_line, MalformedRequest, NotificationRequest, Response};
pub use server::{RelayServer, RelayServerConfig};
pub use sink::{Dispatcher, HostOs, Notification, NotificationSink};

/// Port the relay listens on unless told otherwise
pub const DEFAULT_PORT: u16 = 29325;
