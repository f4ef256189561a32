//! Notification sinks: the host facilities a notification can be shown with
//!
//! Each sink wraps one native mechanism and declares what it can carry. The
//! [`Dispatcher`] holds an ordered chain of sinks chosen once at startup for
//! the host OS and walks it until one succeeds.

mod command;
mod dispatcher;
mod linux;
mod macos;
mod stdout;

pub use command::{find_in_dirs, find_in_path, run_tool, DEFAULT_TOOL_TIMEOUT};
pub use dispatcher::{DispatchOptions, DispatchOutcome, Dispatcher};
pub use linux::NotifySendSink;
pub use macos::{OsascriptSink, TerminalNotifierSink};
pub use stdout::StdoutSink;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// A notification that passed the policy, with its timeout resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub url: Option<String>,
    /// Display timeout in seconds; 0 keeps it until dismissed
    pub timeout_secs: u64,
    pub kind: String,
}

impl Notification {
    /// Whether the caller asked for click-through to a URL
    pub fn wants_url(&self) -> bool {
        self.url.is_some()
    }

    /// Whether the notification needs an explicit auto-dismiss timer
    pub fn wants_timeout(&self) -> bool {
        self.timeout_secs > 0
    }
}

/// Features a sink can honor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub url: bool,
    pub timeout: bool,
    pub sound: bool,
}

/// Errors from notification sinks
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{tool} is not available")]
    Unavailable { tool: String },

    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Exit {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },

    #[error("Failed to write notification: {0}")]
    Output(#[from] std::io::Error),
}

/// One way of surfacing a notification on the host
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Advice shown when this sink had to drop a requested feature
    fn upgrade_hint(&self) -> Option<&str> {
        None
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError>;
}

/// Host operating system, as far as notification tooling is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    MacOs,
    Linux,
    Other,
}

impl HostOs {
    /// Detect the OS this process runs on
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    pub fn from_os_name(name: &str) -> Self {
        match name {
            "macos" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            _ => HostOs::Other,
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::MacOs => write!(f, "macos"),
            HostOs::Linux => write!(f, "linux"),
            HostOs::Other => write!(f, "other"),
        }
    }
}
