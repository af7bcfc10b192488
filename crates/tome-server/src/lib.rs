//! Tome compile server.
//!
//! Serves a module library over HTTP: listing and editing modules, the
//! dependency-graph view, and compiling module sets to HTML or PDF.
//!
//! # Architecture
//!
//! - **Routes**: axum handlers over shared [`AppState`]
//! - **Library**: in-memory [`ModuleLibrary`] behind a `tokio` `RwLock`
//! - **Paginator**: a fresh headless browser per PDF compile

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tome_core::ModuleLibrary;
use tome_render::{ChromePaginator, PdfSettings};

pub use error::{ServerError, ServerResult};
pub use routes::{AppState, ModuleListing, create_router};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Settings for PDF compiles.
    pub pdf: PdfSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            pdf: PdfSettings::from_env(),
        }
    }
}

impl ServerConfig {
    fn socket_addr(&self) -> ServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::Io {
                path: std::path::PathBuf::new(),
                message: format!("Invalid address: {}:{}", self.host, self.port),
            })
    }
}

/// Start the Tome server for a library file.
pub async fn serve(library_path: impl AsRef<Path>, config: ServerConfig) -> ServerResult<()> {
    let path = library_path.as_ref();
    let library = ModuleLibrary::load(path)?;

    let state = Arc::new(AppState::new(library, ChromePaginator::new(config.pdf.clone())));
    let app = create_router(state);

    let addr = config.socket_addr()?;
    tracing::info!("Starting Tome server at http://{}", addr);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });

    server.await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.pdf.margin_mm, 20.0);
    }

    #[test]
    fn test_invalid_address() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.socket_addr(), Err(ServerError::Io { .. })));
    }
}
