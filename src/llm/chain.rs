// ABOUTME: Ordered provider fallback chain walked until one provider yields usable text
// ABOUTME: Call failures and empty generations advance the chain; exhaustion aggregates them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! # Provider Fallback Chain
//!
//! The chain holds an ordered list of providers behind the [`LlmProvider`]
//! trait and tries each in turn: build the request, call the provider, and
//! take the first non-empty text. A failed call (error status or network
//! error) or an empty generation advances to the next provider. If every
//! provider is exhausted, the chain fails with one aggregate error naming
//! each attempt.
//!
//! This is sequential retry-with-different-backend: no delays, no health
//! tracking across requests, never parallel.

use tracing::{info, warn};

use super::{ChatRequest, ChatResponse, GeminiProvider, GroqProvider, HuggingFaceProvider,
    LlmProvider, VertexAiProvider};
use crate::config::{LlmConfig, ProviderKind};
use crate::errors::AppError;

/// A successful generation along with the provider that produced it
#[derive(Debug)]
pub struct ChainOutcome {
    /// The provider response
    pub response: ChatResponse,
    /// Name of the provider that produced it
    pub provider: &'static str,
}

/// Ordered fallback chain over polymorphic LLM providers
pub struct ProviderChain {
    providers: Vec<Box<dyn LlmProvider>>,
}

impl ProviderChain {
    /// Create a chain from pre-built providers, tried in the given order
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty.
    pub fn new(providers: Vec<Box<dyn LlmProvider>>) -> Result<Self, AppError> {
        if providers.is_empty() {
            return Err(AppError::config_missing(
                "Provider chain is empty - configure at least one provider",
            ));
        }
        Ok(Self { providers })
    }

    /// Build the chain from configuration
    ///
    /// Each configured [`ProviderKind`] is constructed from its environment
    /// credentials. A provider whose construction fails (missing key) is
    /// skipped with a warning so the remaining chain stays usable.
    ///
    /// # Errors
    ///
    /// Returns an error if no configured provider could be constructed.
    pub fn from_config(config: &LlmConfig) -> Result<Self, AppError> {
        let mut providers: Vec<Box<dyn LlmProvider>> = Vec::with_capacity(config.chain.len());

        for kind in &config.chain {
            match Self::build_provider(*kind) {
                Ok(provider) => {
                    info!(
                        "Registered provider {} (model: {})",
                        provider.display_name(),
                        provider.default_model()
                    );
                    providers.push(provider);
                }
                Err(e) => {
                    warn!("Skipping provider {kind}: {e}");
                }
            }
        }

        if providers.is_empty() {
            return Err(AppError::config_missing(format!(
                "No usable LLM provider: none of the configured providers ({}) could be \
                 initialized. Check the provider API key environment variables.",
                config
                    .chain
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        Ok(Self { providers })
    }

    /// Construct a single provider from environment credentials
    fn build_provider(kind: ProviderKind) -> Result<Box<dyn LlmProvider>, AppError> {
        Ok(match kind {
            ProviderKind::Groq => Box::new(GroqProvider::from_env()?),
            ProviderKind::Gemini => Box::new(GeminiProvider::from_env()?),
            ProviderKind::HuggingFace => Box::new(HuggingFaceProvider::from_env()?),
            ProviderKind::Vertex => Box::new(VertexAiProvider::from_env()?),
        })
    }

    /// Names of the providers in chain order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Number of providers in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the chain is empty (never true for a constructed chain)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Walk the chain until a provider produces non-empty text
    ///
    /// Providers after the first success are not called. JSON mode is only
    /// passed through to providers that support it.
    ///
    /// # Errors
    ///
    /// Returns an aggregate `EXTERNAL_SERVICE_ERROR` naming every attempted
    /// provider when the chain is exhausted.
    pub async fn generate(&self, request: &ChatRequest) -> Result<ChainOutcome, AppError> {
        let mut failures: Vec<String> = Vec::new();

        for provider in &self.providers {
            // Downgrade json_mode for providers that cannot honor it; they
            // still receive the schema instructions in the prompt.
            let mut attempt = request.clone();
            if attempt.json_mode && !provider.capabilities().supports_json_mode() {
                attempt.json_mode = false;
            }

            match provider.complete(&attempt).await {
                Ok(response) if response.content.trim().is_empty() => {
                    warn!("Provider {} returned empty text, trying next", provider.name());
                    failures.push(format!("{}: empty response", provider.name()));
                }
                Ok(response) => {
                    info!(
                        provider = provider.name(),
                        model = %response.model,
                        "Generation succeeded"
                    );
                    return Ok(ChainOutcome {
                        response,
                        provider: provider.name(),
                    });
                }
                Err(e) => {
                    warn!("Provider {} failed: {e}, trying next", provider.name());
                    failures.push(format!("{}: {}", provider.name(), e.message));
                }
            }
        }

        Err(AppError::new(
            crate::errors::ErrorCode::ExternalServiceError,
            format!("All AI providers failed [{}]", failures.join("; ")),
        ))
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}
