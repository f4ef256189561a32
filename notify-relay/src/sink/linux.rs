//! Linux sink: freedesktop notify-send

use super::command::{find_in_dirs, find_in_path, run_tool};
use super::{Capabilities, DispatchError, DispatchOptions, Notification, NotificationSink};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

const NOTIFY_SEND: &str = "notify-send";

/// notify-send's `-t` is a gint of milliseconds
const MAX_EXPIRE_MILLIS: u64 = i32::MAX as u64;

/// notify-send: URLs are appended to the body, timeouts are in milliseconds
#[derive(Debug, Clone)]
pub struct NotifySendSink {
    program: PathBuf,
    tool_timeout: Duration,
}

impl NotifySendSink {
    pub fn new(program: PathBuf, options: &DispatchOptions) -> Self {
        Self {
            program,
            tool_timeout: options.tool_timeout,
        }
    }

    /// Locate notify-send on `PATH`
    pub fn detect(options: &DispatchOptions) -> Option<Self> {
        find_in_path(NOTIFY_SEND).map(|program| Self::new(program, options))
    }

    /// Locate notify-send in the given search path
    pub fn detect_in(options: &DispatchOptions, search_path: &OsStr) -> Option<Self> {
        find_in_dirs(NOTIFY_SEND, search_path).map(|program| Self::new(program, options))
    }

    /// Notification body, with the URL on its own paragraph when present
    pub fn build_body(notification: &Notification) -> String {
        match &notification.url {
            Some(url) => format!("{}\n\n🔗 {}", notification.message, url),
            None => notification.message.clone(),
        }
    }

    /// Build the notify-send argument list
    pub fn build_args(notification: &Notification) -> Vec<String> {
        let mut args = Vec::new();

        // 0 means persistent: leave the flag out rather than passing -t 0
        if notification.wants_timeout() {
            args.push("-t".to_string());
            let millis = notification
                .timeout_secs
                .saturating_mul(1000)
                .min(MAX_EXPIRE_MILLIS);
            args.push(millis.to_string());
        }

        args.push("--".to_string());
        args.push(notification.title.clone());
        args.push(Self::build_body(notification));
        args
    }
}

#[async_trait]
impl NotificationSink for NotifySendSink {
    fn name(&self) -> &str {
        NOTIFY_SEND
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            url: true,
            timeout: true,
            sound: false,
        }
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::build_args(notification));
        run_tool(NOTIFY_SEND, cmd, self.tool_timeout).await
    }
}
