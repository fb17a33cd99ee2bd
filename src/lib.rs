// ABOUTME: Main library entry point for the ZindeAI plan router
// ABOUTME: Provides the HTTP glue between mobile clients and LLM plan generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

#![deny(unsafe_code)]

//! # ZindeAI Plan Router
//!
//! A thin backend service that accepts user fitness/diet profiles over HTTP,
//! formats natural-language prompts, forwards them to an ordered chain of
//! LLM providers, and reshapes the returned text into the JSON plan
//! structures consumed by the mobile client.
//!
//! ## Architecture
//!
//! Control flow per request is strictly linear:
//! parse -> build prompt -> call provider chain -> recover JSON -> validate -> reply.
//!
//! - **`llm`**: Provider SPI plus Gemini, Groq, Hugging Face, and Vertex AI
//!   clients behind one trait, walked in order by the fallback chain
//! - **`plans`**: Request/response DTOs, prompt builders, best-effort
//!   text-to-JSON recovery, and semantic plan validation
//! - **`routes`**: The HTTP surface (plan generation + health checks)
//! - **`config`**: Environment-driven configuration resolved once at startup
//!
//! ## Example
//!
//! ```rust,no_run
//! use zindeai_router::config::environment::ServerConfig;
//! use zindeai_router::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Plan router configured: {}", config.summary());
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// Unified error handling system
pub mod errors;

/// LLM provider abstraction and fallback chain
pub mod llm;

/// Logging configuration and initialization
pub mod logging;

/// Plan data model, prompts, recovery, and validation
pub mod plans;

/// HTTP route handlers
pub mod routes;

/// Server assembly and lifecycle
pub mod server;
