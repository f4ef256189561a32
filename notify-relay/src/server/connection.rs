//! One request/response exchange on an accepted connection

use crate::error::Result;
use crate::filter::{Decision, PolicyEngine};
use crate::protocol::{parse_request_line, MalformedRequest, Response};
use crate::sink::Dispatcher;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::{debug, info};

/// Bounds on reading the request line
#[derive(Debug, Clone)]
pub struct ConnectionLimits {
    /// How long to wait for the request line
    pub read_timeout: Duration,
    /// Longest accepted request line in bytes
    pub max_line_length: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(30),
            max_line_length: 8 * 1024,
        }
    }
}

/// Decide the response for one request line, dispatching if it is shown
pub async fn respond(line: &str, engine: &PolicyEngine, dispatcher: &Dispatcher) -> Response {
    let request = match parse_request_line(line) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected request line {:?}", line);
            return e.into();
        }
    };

    match engine.evaluate(request) {
        Decision::Filtered => {
            debug!("Notification filtered by policy");
            Response::Filtered
        }
        Decision::Show(notification) => {
            info!(
                kind = %notification.kind,
                timeout = notification.timeout_secs,
                "Notification: {}: {}",
                notification.title,
                notification.message
            );
            dispatcher.dispatch(&notification).await;
            Response::Ok
        }
    }
}

/// Handle a single client connection
///
/// Reads one line, writes one response line and shuts the stream down.
/// Returns `None` when the client went away or stayed silent past the read
/// timeout, in which case nothing is written.
pub async fn handle_connection<S>(
    stream: S,
    engine: &PolicyEngine,
    dispatcher: &Dispatcher,
    limits: &ConnectionLimits,
) -> Result<Option<Response>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(limits.max_line_length));

    let response = match tokio::time::timeout(limits.read_timeout, framed.next()).await {
        Err(_elapsed) => {
            debug!("Timed out waiting for request line");
            return Ok(None);
        }
        Ok(None) => {
            debug!("Connection closed before a request line");
            return Ok(None);
        }
        Ok(Some(Ok(line))) => respond(&line, engine, dispatcher).await,
        Ok(Some(Err(LinesCodecError::MaxLineLengthExceeded))) => {
            debug!("Request line longer than {} bytes", limits.max_line_length);
            MalformedRequest.into()
        }
        Ok(Some(Err(LinesCodecError::Io(e)))) if e.kind() == std::io::ErrorKind::InvalidData => {
            debug!("Request line is not valid UTF-8");
            MalformedRequest.into()
        }
        Ok(Some(Err(LinesCodecError::Io(e)))) => return Err(e.into()),
    };

    framed
        .send(response.to_string())
        .await
        .map_err(|e| match e {
            LinesCodecError::Io(e) => e,
            LinesCodecError::MaxLineLengthExceeded => {
                std::io::Error::new(std::io::ErrorKind::InvalidData, "response line too long")
            }
        })?;

    let mut stream = framed.into_inner();
    let _ = stream.shutdown().await;

    Ok(Some(response))
}
