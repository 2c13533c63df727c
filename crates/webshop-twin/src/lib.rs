//! webshop-twin: an in-process stand-in for the Demo Web Shop storefront
//!
//! Serves the handful of storefront pages the browser flows touch, with the
//! same markup hooks and texts, so the page objects can be exercised offline
//! and deterministically. State is in memory and dies with the server.
//!
//! # Example
//!
//! ```ignore
//! let server = webshop_twin::TwinServer::start().await?;
//! let base_url = server.url();
//! // ... point a browser at base_url ...
//! server.shutdown();
//! ```

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod listing;
mod routes;
pub mod state;
pub mod views;

use std::net::{Ipv4Addr, SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub use catalog::Catalog;
pub use error::{TwinError, TwinResult};
pub use routes::SESSION_COOKIE_NAME;
pub use state::AppState;

/// The storefront router over a fresh demo catalogue and no accounts.
pub fn app() -> Router {
    routes::router(AppState::default())
}

/// Running twin server handle
pub struct TwinServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TwinServer {
    /// Starts on a random free port on the loopback interface.
    pub async fn start() -> std::io::Result<Self> {
        Self::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await
    }

    pub async fn bind(addr: SocketAddr) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let app = app();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "storefront twin stopped");
            }
        });

        info!(%addr, "storefront twin listening");
        Ok(Self { addr, handle })
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops serving. Open connections are dropped.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}
