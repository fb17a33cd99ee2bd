// ABOUTME: Server binary for the ZindeAI plan router
// ABOUTME: Loads configuration, builds the provider chain, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! # ZindeAI Plan Router Binary
//!
//! Starts the plan generation API: environment configuration, structured
//! logging, the LLM provider fallback chain, and the axum HTTP surface.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use zindeai_router::{
    config::{environment::ServerConfig, ProviderKind},
    llm::ProviderChain,
    logging,
    server::{PlanServer, ServerResources},
};

#[derive(Parser)]
#[command(name = "zindeai-router")]
#[command(about = "ZindeAI plan router - LLM-backed meal and workout plan generation")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the provider fallback chain (comma-separated, in order)
    #[arg(long)]
    providers: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(providers) = args.providers.as_deref() {
        let chain = ProviderKind::parse_chain(providers);
        if !chain.is_empty() {
            config.llm.chain = chain;
        }
    }

    logging::init_from_env()?;

    info!("Starting ZindeAI plan router");
    info!("{}", config.summary());

    // Build the provider fallback chain from configured credentials
    let chain = ProviderChain::from_config(&config.llm)?;
    info!("Provider chain ready: {:?}", chain.provider_names());

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(config, chain));
    let server = PlanServer::new(resources);

    display_available_endpoints(port);

    if let Err(e) = server.run(port).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Display the available API endpoints
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    info!("=== Available API Endpoints ===");
    info!("Plan Generation:");
    info!("   Generate Plan:  POST http://{host}:{port}/api/plan");
    info!("   Legacy Alias:   POST http://{host}:{port}/api/zindeai-router");
    info!("Monitoring:");
    info!("   Health Check:   GET  http://{host}:{port}/health");
    info!("   Readiness:      GET  http://{host}:{port}/ready");
    info!("=== End of Endpoint List ===");
}
