// ABOUTME: Environment-based server configuration loaded once at startup
// ABOUTME: All credentials and tunables come from environment variables, never literals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! Server configuration loaded from environment variables.
//!
//! Configuration is resolved once at startup into an explicit [`ServerConfig`]
//! that is passed into the server at construction time. Provider API keys are
//! read here and handed to provider constructors; they are never read from
//! module-level state at call time.

use serde::{Deserialize, Serialize};
use std::env;

use super::types::ProviderKind;
use crate::errors::AppError;

/// Default HTTP port when `ZINDEAI_HTTP_PORT` is not set
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the plan router
    pub http_port: u16,
    /// LLM generation settings and fallback chain
    pub llm: LlmConfig,
}

/// LLM chain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ordered provider fallback chain
    pub chain: Vec<ProviderKind>,
    /// Optional model override applied to every provider in the chain
    pub model: Option<String>,
    /// Sampling temperature for plan generation
    pub temperature: f32,
    /// Maximum tokens the model may generate
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            chain: ProviderKind::DEFAULT_CHAIN.to_vec(),
            model: None,
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but unparseable.
    pub fn from_env() -> Result<Self, AppError> {
        let http_port = parse_env_or("ZINDEAI_HTTP_PORT", DEFAULT_HTTP_PORT)?;

        let chain = ProviderKind::chain_from_env();

        let model = env::var("ZINDEAI_LLM_MODEL").ok().filter(|s| !s.is_empty());
        let temperature = parse_env_or("ZINDEAI_LLM_TEMPERATURE", 0.7_f32)?;
        let max_tokens = parse_env_or("ZINDEAI_LLM_MAX_TOKENS", 4000_u32)?;

        Ok(Self {
            http_port,
            llm: LlmConfig {
                chain,
                model,
                temperature,
                max_tokens,
            },
        })
    }

    /// One-line redacted summary for startup logging
    ///
    /// Never includes key material.
    #[must_use]
    pub fn summary(&self) -> String {
        let chain = self
            .llm
            .chain
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        format!(
            "port={} providers=[{}] model={} temperature={} max_tokens={}",
            self.http_port,
            chain,
            self.llm.model.as_deref().unwrap_or("provider-default"),
            self.llm.temperature,
            self.llm.max_tokens
        )
    }
}

/// Parse an environment variable or fall back to a default
fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T, AppError> {
    match env::var(var) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| AppError::config(format!("{var} is set but not parseable: '{raw}'"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_llm_config() {
        let config = LlmConfig::default();
        assert_eq!(config.chain, ProviderKind::DEFAULT_CHAIN.to_vec());
        assert_eq!(config.max_tokens, 4000);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_summary_redacts_nothing_sensitive() {
        let config = ServerConfig {
            http_port: 9000,
            llm: LlmConfig::default(),
        };
        let summary = config.summary();
        assert!(summary.contains("port=9000"));
        assert!(summary.contains("groq -> gemini -> huggingface"));
    }
}
