//! Last-resort sink that prints the notification to stdout

use super::{Capabilities, DispatchError, Notification, NotificationSink};
use async_trait::async_trait;
use std::io::Write;

/// Prints a record of the notification so it is never silently dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Render the printed record
    pub fn render(notification: &Notification) -> String {
        let mut record = format!(
            "[{}] {}: {}\n",
            notification.kind, notification.title, notification.message
        );

        if let Some(url) = &notification.url {
            record.push_str(&format!("  URL: {}\n", url));
        }

        if notification.wants_timeout() {
            record.push_str(&format!("  Timeout: {}s\n", notification.timeout_secs));
        } else {
            record.push_str("  Timeout: permanent\n");
        }

        record
    }
}

#[async_trait]
impl NotificationSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        write_record(&Self::render(notification))?;
        Ok(())
    }
}

fn write_record(record: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(record.as_bytes())?;
    stdout.flush()
}
