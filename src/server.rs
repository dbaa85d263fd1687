// ABOUTME: HTTP server assembly and lifecycle for the Stride API
// ABOUTME: Merges all route groups, applies tracing and CORS layers, serves until a shutdown signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::middleware::{setup_cors, with_request_tracing};
use crate::resources::ServerResources;
use crate::routes::{AuthRoutes, FitnessRoutes, HealthRoutes, PlanRoutes, UserRoutes, WorkoutRoutes};

/// Build the complete application router
///
/// Unknown paths fall through to a JSON 404 in the standard error envelope.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);
    let router = Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(FitnessRoutes::routes(Arc::clone(&resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(&resources)))
        .merge(PlanRoutes::routes(resources))
        .fallback(handle_not_found);

    with_request_tracing(router).layer(cors)
}

async fn handle_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Owns the shared resources and runs the HTTP listener
pub struct StrideServer {
    resources: Arc<ServerResources>,
}

impl StrideServer {
    /// Create a server over already-initialized resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Bind `0.0.0.0:{port}` and serve until Ctrl+C or SIGTERM
    ///
    /// # Errors
    /// Returns an error if the port cannot be bound or the server fails
    pub async fn run(self, port: u16) -> AppResult<()> {
        let address = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(address).await.map_err(|e| {
            AppError::internal(format!("Failed to bind {address}")).with_source(e)
        })?;
        let local = listener.local_addr().unwrap_or(address);
        info!("Stride API listening on http://{local}");

        let router = build_router(self.resources);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal("HTTP server error").with_source(e))?;

        info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
