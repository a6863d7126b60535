// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! HTTP server exposing live stats

mod handlers;

pub use handlers::{ApiResponse, Empty};

use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use crate::core::Engine;
use handlers::{index_handler, reset_handler, stats_handler};

/// Routes for the dashboard page and the stats API
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1/stats", get(stats_handler))
        .route("/api/v1/reset", post(reset_handler))
        .with_state(engine)
}

/// A bound, not yet serving, HTTP server
pub struct HttpServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    engine: Arc<Engine>,
}

impl HttpServer {
    /// Bind the listener. Port 0 picks a free port.
    pub async fn bind(addr: SocketAddr, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
            engine,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until shutdown is signalled, then drain open connections
    pub async fn serve(self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        info!("HTTP server listening on http://{}", self.local_addr);

        axum::serve(self.listener, router(self.engine))
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("HTTP server shutting down");
            })
            .await?;

        Ok(())
    }
}
