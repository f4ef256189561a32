//! macOS sinks: terminal-notifier when installed, AppleScript otherwise

use super::command::{find_in_dirs, find_in_path, run_tool};
use super::{Capabilities, DispatchError, DispatchOptions, Notification, NotificationSink};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

const TERMINAL_NOTIFIER: &str = "terminal-notifier";
const OSASCRIPT: &str = "osascript";

const TERMINAL_NOTIFIER_HINT: &str = "Install terminal-notifier for clickable notifications and timeout control: brew install terminal-notifier";

/// terminal-notifier: supports click-through URLs, timeouts and sound
#[derive(Debug, Clone)]
pub struct TerminalNotifierSink {
    program: PathBuf,
    enable_sound: bool,
    tool_timeout: Duration,
}

impl TerminalNotifierSink {
    pub fn new(program: PathBuf, options: &DispatchOptions) -> Self {
        Self {
            program,
            enable_sound: options.enable_sound,
            tool_timeout: options.tool_timeout,
        }
    }

    /// Locate terminal-notifier on `PATH`
    pub fn detect(options: &DispatchOptions) -> Option<Self> {
        find_in_path(TERMINAL_NOTIFIER).map(|program| Self::new(program, options))
    }

    /// Locate terminal-notifier in the given search path
    pub fn detect_in(options: &DispatchOptions, search_path: &OsStr) -> Option<Self> {
        find_in_dirs(TERMINAL_NOTIFIER, search_path).map(|program| Self::new(program, options))
    }

    /// Build the terminal-notifier argument list
    pub fn build_args(&self, notification: &Notification) -> Vec<String> {
        let mut args = vec![
            "-title".to_string(),
            notification.title.clone(),
            "-message".to_string(),
            notification.message.clone(),
        ];

        if self.enable_sound {
            args.push("-sound".to_string());
            args.push("default".to_string());
        }

        if let Some(url) = &notification.url {
            args.push("-open".to_string());
            args.push(url.clone());
        }

        // Without -timeout the notification stays until dismissed
        if notification.wants_timeout() {
            args.push("-timeout".to_string());
            args.push(notification.timeout_secs.to_string());
        }

        args
    }
}

#[async_trait]
impl NotificationSink for TerminalNotifierSink {
    fn name(&self) -> &str {
        TERMINAL_NOTIFIER
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            url: true,
            timeout: true,
            sound: true,
        }
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.build_args(notification));
        run_tool(TERMINAL_NOTIFIER, cmd, self.tool_timeout).await
    }
}

/// AppleScript `display notification`: title and message only
#[derive(Debug, Clone)]
pub struct OsascriptSink {
    program: PathBuf,
    tool_timeout: Duration,
}

impl OsascriptSink {
    pub fn new(program: PathBuf, options: &DispatchOptions) -> Self {
        Self {
            program,
            tool_timeout: options.tool_timeout,
        }
    }

    /// Locate osascript on `PATH`
    pub fn detect(options: &DispatchOptions) -> Option<Self> {
        find_in_path(OSASCRIPT).map(|program| Self::new(program, options))
    }

    /// Locate osascript in the given search path
    pub fn detect_in(options: &DispatchOptions, search_path: &OsStr) -> Option<Self> {
        find_in_dirs(OSASCRIPT, search_path).map(|program| Self::new(program, options))
    }

    /// Build the AppleScript source for a notification
    pub fn build_script(notification: &Notification) -> String {
        format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript_string(&notification.message),
            escape_applescript_string(&notification.title)
        )
    }
}

/// Escape text for use inside an AppleScript string literal
fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\n', '\r'], " ")
}

#[async_trait]
impl NotificationSink for OsascriptSink {
    fn name(&self) -> &str {
        OSASCRIPT
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn upgrade_hint(&self) -> Option<&str> {
        Some(TERMINAL_NOTIFIER_HINT)
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-e").arg(Self::build_script(notification));
        run_tool(OSASCRIPT, cmd, self.tool_timeout).await
    }
}
