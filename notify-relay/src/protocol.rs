//! Line protocol spoken between the guest and the relay
//!
//! One request per connection:
//!
//! ```text
//! NOTIFY|<title>|<message>[|<url>[|<timeoutSeconds>[|<type>]]]\n
//! ```
//!
//! answered by exactly one of `OK`, `FILTERED` or an `ERROR:` line.

use std::fmt;
use thiserror::Error;

/// Leading keyword of every request line
pub const NOTIFY_KEYWORD: &str = "NOTIFY";

/// Title substituted when the caller only supplied one payload field
pub const PLACEHOLDER_TITLE: &str = "Notification";

/// Type assumed when the caller does not give one
pub const DEFAULT_KIND: &str = "info";

const FIELD_SEPARATOR: char = '|';
const MAX_FIELDS: usize = 6;

/// A parsed notification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    /// Present only when non-blank
    pub url: Option<String>,
    /// Explicit display timeout; `None` defers to the policy
    pub timeout_secs: Option<u64>,
    /// The wire `type` field
    pub kind: String,
}

/// The request line did not have the `NOTIFY|title|message` shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid format. Use: NOTIFY|title|message|url|timeout|type")]
pub struct MalformedRequest;

/// Status line written back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Displayed, or routed to the stdout fallback
    Ok,
    /// Suppressed by policy
    Filtered,
    /// Rejected; carries the message after `ERROR: `
    Error(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => write!(f, "OK"),
            Response::Filtered => write!(f, "FILTERED"),
            Response::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

impl From<MalformedRequest> for Response {
    fn from(err: MalformedRequest) -> Self {
        Response::Error(err.to_string())
    }
}

impl Response {
    /// Parse a status line received from the relay
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "OK" => Some(Response::Ok),
            "FILTERED" => Some(Response::Filtered),
            _ => line
                .strip_prefix("ERROR:")
                .map(|message| Response::Error(message.trim().to_string())),
        }
    }
}

/// Parse one request line
///
/// Never fails on odd field contents: a blank URL is dropped, a timeout that
/// is not a non-negative integer is treated as absent, and a blank type
/// becomes `info`. Only the overall shape can make it malformed.
pub fn parse_request_line(line: &str) -> Result<NotificationRequest, MalformedRequest> {
    let parts: Vec<&str> = line.trim().splitn(MAX_FIELDS, FIELD_SEPARATOR).collect();

    if parts.len() < 3 || parts[0] != NOTIFY_KEYWORD {
        return Err(MalformedRequest);
    }

    let mut title = parts[1].to_string();
    let mut message = parts[2].to_string();

    let url = parts
        .get(3)
        .filter(|url| !url.trim().is_empty())
        .map(|url| url.to_string());

    let timeout_secs = parts.get(4).and_then(|raw| parse_timeout(raw));

    let kind = parts
        .get(5)
        .map(|kind| kind.trim())
        .filter(|kind| !kind.is_empty())
        .unwrap_or(DEFAULT_KIND)
        .to_string();

    // A lone payload field is the body, not the title
    if message.is_empty() {
        message = std::mem::replace(&mut title, PLACEHOLDER_TITLE.to_string());
    }

    Ok(NotificationRequest {
        title,
        message,
        url,
        timeout_secs,
        kind,
    })
}

fn parse_timeout(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::debug!("Ignoring non-numeric timeout field: {:?}", raw);
            None
        }
    }
}

impl NotificationRequest {
    /// Create a request with no URL, no explicit timeout and the default type
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            url: None,
            timeout_secs: None,
            kind: DEFAULT_KIND.to_string(),
        }
    }

    /// Render the request as a wire line, without the trailing line break
    ///
    /// Separators and line breaks inside fields cannot be carried by the
    /// protocol and are replaced.
    pub fn to_line(&self) -> String {
        let timeout = self
            .timeout_secs
            .map(|secs| secs.to_string())
            .unwrap_or_default();

        [
            NOTIFY_KEYWORD,
            &sanitize_field(&self.title),
            &sanitize_field(&self.message),
            &sanitize_field(self.url.as_deref().unwrap_or("")),
            &timeout,
            &sanitize_field(&self.kind),
        ]
        .join("|")
    }
}

fn sanitize_field(field: &str) -> String {
    field
        .replace(FIELD_SEPARATOR, "/")
        .replace(['\r', '\n'], " ")
}
