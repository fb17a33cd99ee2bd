// ABOUTME: Hugging Face Hosted Inference API provider for text generation
// ABOUTME: Last resort in the default fallback chain, returns [{generated_text}] payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! # Hugging Face Provider
//!
//! Implementation of the `LlmProvider` trait for the Hugging Face Hosted
//! Inference API. Unlike the chat-style providers, the inference API takes a
//! single `inputs` string, so the conversation is flattened before sending.
//!
//! ## Configuration
//!
//! Set the `HF_API_KEY` environment variable with a token from
//! <https://huggingface.co/settings/tokens>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use crate::errors::{AppError, ErrorCode};

/// Environment variable for the Hugging Face API token
const HF_API_KEY_ENV: &str = "HF_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "microsoft/DialoGPT-medium";

/// Available hosted models
const AVAILABLE_MODELS: &[&str] = &[
    "microsoft/DialoGPT-medium",
    "mistralai/Mistral-7B-Instruct-v0.3",
    "meta-llama/Llama-3.1-8B-Instruct",
];

/// Base URL for the Hosted Inference API
const API_BASE_URL: &str = "https://api-inference.huggingface.co/models";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Inference API request structure
#[derive(Debug, Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
}

/// Generation parameters
#[derive(Debug, Serialize)]
struct HfParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    return_full_text: bool,
}

/// One generation in the inference response array
#[derive(Debug, Deserialize)]
struct HfGeneration {
    generated_text: Option<String>,
}

/// Inference API error response
#[derive(Debug, Deserialize)]
struct HfErrorResponse {
    error: String,
    #[serde(default)]
    estimated_time: Option<f64>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Hugging Face Hosted Inference API provider
pub struct HuggingFaceProvider {
    client: Client,
    api_key: String,
    default_model: String,
}

impl HuggingFaceProvider {
    /// Create a new provider with the given API token
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            default_model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Create a provider from the `HF_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var(HF_API_KEY_ENV).map_err(|_| {
            AppError::config_missing(format!("{HF_API_KEY_ENV} environment variable not set"))
        })?;
        Ok(Self::new(api_key))
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Flatten the conversation into one inference input
    ///
    /// The inference API has no role structure, so system and user turns are
    /// joined with blank lines in order.
    fn flatten_messages(request: &ChatRequest) -> String {
        request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Map an error response body to a typed error
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(err) = serde_json::from_str::<HfErrorResponse>(body) {
            // 503 with estimated_time means the model is still loading
            if status.as_u16() == 503 {
                let hint = err
                    .estimated_time
                    .map_or_else(String::new, |t| format!(" (estimated {t:.0}s)"));
                return AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("Hugging Face model is loading{hint}: {}", err.error),
                )
                .with_provider("huggingface");
            }
            return AppError::external_service("huggingface", err.error);
        }
        AppError::external_service(
            "huggingface",
            format!(
                "API error ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            ),
        )
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn display_name(&self) -> &'static str {
        "Hugging Face Inference"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::text_only()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(DEFAULT_MODEL)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let url = format!("{API_BASE_URL}/{model}");

        let hf_request = HfRequest {
            inputs: Self::flatten_messages(request),
            parameters: HfParameters {
                max_new_tokens: request.max_tokens,
                temperature: request.temperature,
                return_full_text: false,
            },
        };

        debug!("Sending inference request to Hugging Face");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&hf_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Hugging Face: {}", e);
                AppError::external_service("huggingface", format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service("huggingface", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let generations: Vec<HfGeneration> = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Hugging Face response: {}", e);
            AppError::external_service("huggingface", format!("Failed to parse response: {e}"))
        })?;

        let content = generations
            .into_iter()
            .next()
            .and_then(|g| g.generated_text)
            .unwrap_or_default();

        if content.is_empty() {
            warn!("Hugging Face returned an empty generation");
        }

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage: None,
            finish_reason: None,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        // A HEAD on the model endpoint confirms the token and model exist
        let url = format!("{API_BASE_URL}/{}", self.default_model);

        let response = self
            .client
            .head(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("huggingface", format!("Health check failed: {e}"))
            })?;

        Ok(response.status().is_success())
    }
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("default_model", &self.default_model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
