//! Provider connection configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::gemini::{GeminiProvider, GEMINI_BASE_URL};
use super::openai::OpenAiCompatibleProvider;
use super::provider::ModelProvider;

/// Which wire protocol the hosted model speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "openai-compatible" => Ok(ProviderKind::OpenAi),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Configuration for reaching the hosted model API.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub api_key: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl ModelConfig {
    /// Set the provider kind.
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Build the provider client described by this configuration.
    pub fn build_provider(&self) -> Arc<dyn ModelProvider> {
        match self.provider {
            ProviderKind::Gemini => Arc::new(GeminiProvider::with_base_url(
                &self.base_url,
                &self.api_key,
            )),
            ProviderKind::OpenAi => Arc::new(OpenAiCompatibleProvider::new(
                &self.base_url,
                &self.api_key,
            )),
        }
    }
}
