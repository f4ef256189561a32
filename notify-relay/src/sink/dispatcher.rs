//! Ordered fallback across notification sinks

use super::command::DEFAULT_TOOL_TIMEOUT;
use super::{
    HostOs, Notification, NotificationSink, NotifySendSink, OsascriptSink, StdoutSink,
    TerminalNotifierSink,
};
use std::env;
use std::ffi::OsStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings shared by the sinks a dispatcher builds
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Ask sinks that support it to play a sound
    pub enable_sound: bool,
    /// Upper bound on each external notifier run
    pub tool_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            enable_sound: false,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }
}

/// Result of walking the sink chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A sink accepted the notification
    Delivered {
        sink: String,
        /// The sink dropped a URL, timeout or sound that was asked for
        degraded: bool,
    },
    /// Every sink failed
    Exhausted,
}

/// Tries sinks in order until one shows the notification
pub struct Dispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
    enable_sound: bool,
}

impl Dispatcher {
    /// Create a dispatcher over an explicit sink chain
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        Self {
            sinks,
            enable_sound: false,
        }
    }

    /// Count a sink that cannot play sound as degraded
    pub fn with_sound(mut self, enable_sound: bool) -> Self {
        self.enable_sound = enable_sound;
        self
    }

    /// Build the sink chain for a host OS
    ///
    /// Command sinks are only included when their binary is on `PATH`. The
    /// stdout sink always closes the chain.
    pub fn for_host(os: HostOs, options: &DispatchOptions) -> Self {
        let path_env = env::var_os("PATH").unwrap_or_default();
        Self::for_host_in(os, options, &path_env)
    }

    /// Build the sink chain for a host OS, looking for notifier binaries in
    /// `search_path` instead of `PATH`
    pub fn for_host_in(os: HostOs, options: &DispatchOptions, search_path: &OsStr) -> Self {
        let mut sinks: Vec<Box<dyn NotificationSink>> = Vec::new();

        match os {
            HostOs::MacOs => {
                match TerminalNotifierSink::detect_in(options, search_path) {
                    Some(sink) => sinks.push(Box::new(sink)),
                    None => debug!("terminal-notifier not found on PATH"),
                }
                match OsascriptSink::detect_in(options, search_path) {
                    Some(sink) => sinks.push(Box::new(sink)),
                    None => debug!("osascript not found on PATH"),
                }
            }
            HostOs::Linux => match NotifySendSink::detect_in(options, search_path) {
                Some(sink) => sinks.push(Box::new(sink)),
                None => warn!("notify-send not found on PATH, notifications will be printed"),
            },
            HostOs::Other => {}
        }

        sinks.push(Box::new(StdoutSink));
        Self::new(sinks).with_sound(options.enable_sound)
    }

    /// Names of the sinks in the chain, in order
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Show a notification with the first sink that succeeds
    ///
    /// Sink failures are logged and never propagated.
    pub async fn dispatch(&self, notification: &Notification) -> DispatchOutcome {
        for sink in &self.sinks {
            match sink.send(notification).await {
                Ok(()) => {
                    let caps = sink.capabilities();
                    let degraded = (notification.wants_url() && !caps.url)
                        || (notification.wants_timeout() && !caps.timeout)
                        || (self.enable_sound && !caps.sound);

                    debug!(
                        sink = sink.name(),
                        kind = %notification.kind,
                        degraded,
                        "notification delivered"
                    );

                    if degraded {
                        if let Some(hint) = sink.upgrade_hint() {
                            info!("{}", hint);
                        }
                    }

                    return DispatchOutcome::Delivered {
                        sink: sink.name().to_string(),
                        degraded,
                    };
                }
                Err(e) => {
                    warn!(sink = sink.name(), "Notification sink failed: {}", e);
                }
            }
        }

        warn!(title = %notification.title, "No notification sink succeeded");
        DispatchOutcome::Exhausted
    }
}
