use super::connection::{handle_connection, ConnectionLimits};
use crate::error::{RelayError, Result};
use crate::filter::PolicyEngine;
use crate::sink::Dispatcher;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Relay server configuration
#[derive(Clone)]
pub struct RelayServerConfig {
    /// Loopback port to listen on; 0 picks a free port
    pub port: u16,
    /// Policy the requests are evaluated against
    pub engine: Arc<PolicyEngine>,
    /// Sink chain for notifications that pass the policy
    pub dispatcher: Arc<Dispatcher>,
    pub limits: ConnectionLimits,
}

/// Notification relay bound to its loopback port
pub struct RelayServer {
    listener: TcpListener,
    config: RelayServerConfig,
}

impl RelayServer {
    /// Bind the listener on 127.0.0.1
    ///
    /// A port held by another process is reported as [`RelayError::PortInUse`];
    /// no other port is tried.
    pub async fn bind(config: RelayServerConfig) -> Result<Self> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, config.port));

        let listener = TcpListener::bind(addr).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::AddrInUse {
                RelayError::PortInUse { port: config.port }
            } else {
                RelayError::Bind { addr, source }
            }
        })?;

        info!(
            "Notification server listening on port {}",
            listener.local_addr()?.port()
        );

        Ok(Self { listener, config })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn config(&self) -> &RelayServerConfig {
        &self.config
    }

    /// Accept and handle connections one at a time until `shutdown` resolves
    ///
    /// Shutdown is only observed between connections, so an exchange that
    /// has started always gets its response. The listener is closed on return.
    pub async fn serve<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutting down notification server...");
                    break;
                }
                accepted = self.listener.accept() => {
                    let (socket, peer_addr) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!("Failed to accept connection: {}", e);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            continue;
                        }
                    };

                    debug!("Client connected: {}", peer_addr);

                    match handle_connection(
                        socket,
                        &self.config.engine,
                        &self.config.dispatcher,
                        &self.config.limits,
                    )
                    .await
                    {
                        Ok(Some(response)) => debug!("Replied {} to {}", response, peer_addr),
                        Ok(None) => debug!("No request from {}", peer_addr),
                        Err(e) => warn!("Error handling client {}: {}", peer_addr, e),
                    }
                }
            }
        }
    }
}
