// ABOUTME: Core configuration type definitions for provider selection and log levels
// ABOUTME: Contains the ProviderKind enum and its environment parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// LLM provider selection for plan generation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq provider - LPU-accelerated inference via `OpenAI`-compatible API (default)
    #[default]
    Groq,
    /// Google Gemini provider via the Generative Language API
    Gemini,
    /// Hugging Face Hosted Inference API provider
    HuggingFace,
    /// Google Vertex AI provider with service-account authentication
    Vertex,
}

impl ProviderKind {
    /// Environment variable holding the ordered provider fallback chain
    pub const CHAIN_ENV_VAR: &'static str = "ZINDEAI_LLM_PROVIDERS";

    /// Default fallback chain when `ZINDEAI_LLM_PROVIDERS` is not set
    pub const DEFAULT_CHAIN: &'static [Self] = &[Self::Groq, Self::Gemini, Self::HuggingFace];

    /// Parse a single provider name, accepting common aliases
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "gemini" | "google" => Some(Self::Gemini),
            "hf" | "huggingface" | "hugging-face" => Some(Self::HuggingFace),
            "vertex" | "vertexai" | "vertex-ai" => Some(Self::Vertex),
            _ => None,
        }
    }

    /// Parse an ordered, comma-separated provider chain
    ///
    /// Unknown names are skipped with a warning so a typo in one entry does
    /// not take down the rest of the chain.
    #[must_use]
    pub fn parse_chain(s: &str) -> Vec<Self> {
        let mut chain = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match Self::from_str_opt(part) {
                Some(kind) if chain.contains(&kind) => {
                    tracing::warn!("Duplicate provider '{part}' in {}", Self::CHAIN_ENV_VAR);
                }
                Some(kind) => chain.push(kind),
                None => {
                    tracing::warn!("Unknown provider '{part}' in {}", Self::CHAIN_ENV_VAR);
                }
            }
        }
        chain
    }

    /// Load the ordered fallback chain from the environment
    ///
    /// Falls back to [`Self::DEFAULT_CHAIN`] when the variable is unset or
    /// parses to an empty list.
    #[must_use]
    pub fn chain_from_env() -> Vec<Self> {
        let chain = env::var(Self::CHAIN_ENV_VAR)
            .map(|s| Self::parse_chain(&s))
            .unwrap_or_default();
        if chain.is_empty() {
            Self::DEFAULT_CHAIN.to_vec()
        } else {
            chain
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Groq => write!(f, "groq"),
            Self::Gemini => write!(f, "gemini"),
            Self::HuggingFace => write!(f, "huggingface"),
            Self::Vertex => write!(f, "vertex"),
        }
    }
}
