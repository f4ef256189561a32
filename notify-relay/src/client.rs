//! Guest-side client for the relay protocol

use crate::error::{RelayError, Result};
use crate::protocol::{NotificationRequest, Response};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

/// Send one request line and wait for the relay's status line
pub async fn send_line<A: ToSocketAddrs>(addr: A, line: &str, timeout: Duration) -> Result<Response> {
    tokio::time::timeout(timeout, exchange(addr, line))
        .await
        .map_err(|_| RelayError::Timeout {
            secs: timeout.as_secs(),
        })?
}

/// Send a notification request to the relay
pub async fn send_request<A: ToSocketAddrs>(
    addr: A,
    request: &NotificationRequest,
    timeout: Duration,
) -> Result<Response> {
    send_line(addr, &request.to_line(), timeout).await
}

async fn exchange<A: ToSocketAddrs>(addr: A, line: &str) -> Result<Response> {
    let mut stream = TcpStream::connect(addr).await?;
    debug!("Connected to relay at {:?}", stream.peer_addr().ok());

    stream.write_all(line.trim_end().as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.flush().await?;

    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply).await?;
    debug!("Relay replied {:?}", reply);

    Response::parse(&reply).ok_or(RelayError::UnexpectedResponse(reply))
}
