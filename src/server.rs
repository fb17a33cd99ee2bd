// ABOUTME: HTTP server assembly wiring routes, CORS, and request tracing
// ABOUTME: Holds the shared ServerResources (configuration and provider chain)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! Server assembly and lifecycle
//!
//! [`ServerResources`] bundles everything a request handler needs: the
//! configuration loaded at startup and the constructed provider chain. The
//! resources are created once and shared behind an `Arc`; requests hold no
//! other state.

use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::errors::AppError;
use crate::llm::ProviderChain;
use crate::routes::{HealthRoutes, PlanRoutes};

/// Shared per-process resources handed to request handlers
pub struct ServerResources {
    /// Configuration loaded from the environment at startup
    pub config: ServerConfig,
    /// Ordered LLM provider fallback chain
    pub chain: ProviderChain,
}

impl ServerResources {
    /// Bundle configuration and the provider chain
    #[must_use]
    pub const fn new(config: ServerConfig, chain: ProviderChain) -> Self {
        Self { config, chain }
    }
}

/// The plan router HTTP server
pub struct PlanServer {
    resources: Arc<ServerResources>,
}

impl PlanServer {
    /// Create a server around shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the complete router with CORS and tracing layers
    #[must_use]
    pub fn router(&self) -> Router {
        // Header set the mobile client and Supabase-era callers send
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-client-info"),
                HeaderName::from_static("apikey"),
            ]);

        Router::new()
            .merge(HealthRoutes::routes())
            .merge(PlanRoutes::routes(self.resources.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Bind and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails.
    pub async fn run(&self, port: u16) -> Result<(), AppError> {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind port {port}: {e}")))?;

        info!("Plan router listening on port {port}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))
    }
}

/// Resolve when the process receives SIGINT
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install shutdown handler: {e}");
    } else {
        info!("Shutdown signal received");
    }
}
