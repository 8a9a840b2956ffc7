//! Interface server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::http::routes::{create_router, RouterOptions};
use crate::state::AppState;

/// Interface server configuration.
#[derive(Debug, Clone)]
pub struct InterfaceConfig {
    pub host: String,
    pub port: u16,
    pub router: RouterOptions,
}

impl InterfaceConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            router: RouterOptions::default(),
        }
    }

    pub fn with_router_options(mut self, router: RouterOptions) -> Self {
        self.router = router;
        self
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 5000)
    }
}

/// The interface server.
pub struct InterfaceServer {
    config: InterfaceConfig,
    state: Arc<AppState>,
}

impl InterfaceServer {
    pub fn new(config: InterfaceConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Start the server and serve until Ctrl-C or SIGTERM.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = create_router(self.state.clone(), &self.config.router);

        let addr = self.resolve_addr().await?;
        let listener = TcpListener::bind(addr).await?;

        info!("WebLens API listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("WebLens API stopped");
        Ok(())
    }

    async fn resolve_addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        if let Ok(addr) = self.addr().parse::<SocketAddr>() {
            return Ok(addr);
        }

        // Host names such as `localhost` need a lookup.
        tokio::net::lookup_host(self.addr())
            .await?
            .next()
            .ok_or_else(|| format!("Could not resolve {}", self.addr()).into())
    }
}

/// Resolve when the process is asked to stop.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
