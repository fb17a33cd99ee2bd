// ABOUTME: Configuration module exposing environment-driven server settings
// ABOUTME: Re-exports the ServerConfig object and the provider selection types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! Configuration management
//!
//! All configuration comes from environment variables, resolved once at
//! startup into a [`ServerConfig`] passed to the server at construction.

pub mod environment;
pub mod types;

pub use environment::{LlmConfig, ServerConfig};
pub use types::ProviderKind;
