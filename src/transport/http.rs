//! HTTP transport
//!
//! Serves the router until Ctrl+C, letting in-flight requests finish.

use crate::config::ServerConfig;
use crate::error::TransportError;
use axum::Router;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, lookup_host};
use tracing::info;

/// Default port for the HTTP server
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address to bind to (e.g., "127.0.0.1:8080")
    pub bind: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_HTTP_PORT)),
        }
    }
}

impl HttpConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self { bind }
    }

    /// Create config from an IP literal and port
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, TransportError> {
        let ip = host
            .trim_matches(|c| c == '[' || c == ']')
            .parse::<IpAddr>()
            .map_err(|e| TransportError::InvalidAddress {
                addr: format!("{}:{}", host, port),
                reason: e.to_string(),
            })?;
        Ok(Self::new(SocketAddr::new(ip, port)))
    }

    /// Create config from a host name or IP literal, resolving names via DNS
    ///
    /// The first resolved address is used.
    pub async fn resolve(host: &str, port: u16) -> Result<Self, TransportError> {
        if let Ok(config) = Self::from_host_port(host, port) {
            return Ok(config);
        }

        let addr = format!("{}:{}", host, port);
        let mut resolved = lookup_host((host, port)).await.map_err(|e| {
            TransportError::InvalidAddress {
                addr: addr.clone(),
                reason: e.to_string(),
            }
        })?;

        resolved
            .next()
            .map(Self::new)
            .ok_or_else(|| TransportError::InvalidAddress {
                addr,
                reason: "host name resolved to no addresses".to_string(),
            })
    }

    /// Bind address for the `[server]` section
    pub async fn from_server(server: &ServerConfig) -> Result<Self, TransportError> {
        Self::resolve(&server.host, server.port).await
    }
}

/// Run the HTTP server and wait for a shutdown signal (Ctrl+C)
pub async fn run_http(router: Router, config: HttpConfig) -> Result<(), TransportError> {
    let listener = TcpListener::bind(config.bind).await?;
    info!("Press Ctrl+C to stop the server");
    serve_until(listener, router, shutdown_signal()).await
}

/// Serve `router` on an already bound listener until `shutdown` resolves
pub async fn serve_until<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
) -> Result<(), TransportError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // If the handler cannot be installed, wait forever rather than exit
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
