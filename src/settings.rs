//! Shared settings for the study gateway CLI and embedding applications.
//! Persisted in the platform-specific config directory via `directories::ProjectDirs`,
//! with environment variables taking precedence over the file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::gateway::{GatewayConfig, ModelChoice, DEFAULT_CACHE_TTL, DEFAULT_CANDIDATES};
use crate::model::{ModelConfig, ProviderKind, GEMINI_BASE_URL};
use crate::session::DEFAULT_COOLDOWN;

/// Default base URL for OpenAI-compatible servers (local vLLM and friends).
pub const OPENAI_DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";

/// Settings errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot determine config directory")]
    NoConfigDir,
    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Application settings that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Provider wire protocol
    pub provider: ProviderKind,
    /// Model API base URL
    pub base_url: String,
    /// Model API key
    pub api_key: String,
    /// Candidate model identifiers, primary first
    pub candidates: Vec<String>,
    /// Lifetime of cached text responses in seconds
    pub cache_ttl_secs: u64,
    /// Pause after a rate-limited call in seconds
    pub cooldown_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: String::new(),
            candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            cooldown_secs: DEFAULT_COOLDOWN.as_secs(),
        }
    }
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "moderras", "study-gateway")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file, then apply environment overrides.
    pub fn load() -> Self {
        let mut loaded: Self = Self::settings_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        loaded.apply_env(|key| env::var(key).ok());
        loaded.backfill();
        loaded
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<(), SettingsError> {
        let dir = Self::config_dir().ok_or(SettingsError::NoConfigDir)?;
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join("settings.json"), content)?;
        Ok(())
    }

    /// Override fields from environment variables looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("MODEL_PROVIDER").and_then(|p| p.parse().ok()) {
            if provider != self.provider && self.base_url == default_base_url(self.provider) {
                self.base_url = default_base_url(provider).to_string();
            }
            self.provider = provider;
        }
        if let Some(base_url) = lookup("MODEL_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(api_key) = lookup("GEMINI_API_KEY").or_else(|| lookup("MODEL_API_KEY")) {
            self.api_key = api_key;
        }
        if let Some(candidates) = lookup("MODEL_CANDIDATES") {
            self.candidates = candidates
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        if let Some(ttl) = lookup("CACHE_TTL_SECS").and_then(|s| s.parse().ok()) {
            self.cache_ttl_secs = ttl;
        }
        if let Some(cooldown) = lookup("COOLDOWN_SECS").and_then(|s| s.parse().ok()) {
            self.cooldown_secs = cooldown;
        }
    }

    /// Backfill fields left empty by older config files.
    fn backfill(&mut self) {
        if self.base_url.trim().is_empty() {
            self.base_url = default_base_url(self.provider).to_string();
        }
        if ModelChoice::new(self.candidates.iter().cloned()).is_none() {
            self.candidates = Self::default().candidates;
        }
    }

    /// Provider connection settings.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::default()
            .with_provider(self.provider)
            .with_base_url(&self.base_url)
            .with_api_key(&self.api_key)
    }

    /// Gateway settings. Falls back to the default candidates if none are set.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::default()
            .with_candidates(ModelChoice::new(self.candidates.iter().cloned()).unwrap_or_default())
            .with_cache_ttl(Duration::from_secs(self.cache_ttl_secs))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

fn default_base_url(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Gemini => GEMINI_BASE_URL,
        ProviderKind::OpenAi => OPENAI_DEFAULT_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.provider, ProviderKind::Gemini);
        assert_eq!(settings.candidates[0], "gemini-1.5-flash");
        assert_eq!(settings.cache_ttl_secs, 600);
        assert_eq!(settings.cooldown_secs, 60);
        assert_eq!(settings.gateway_config().cache_ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = AppSettings::default();
        settings.apply_env(env_of(&[
            ("GEMINI_API_KEY", "secret"),
            ("MODEL_CANDIDATES", "primary, fallback ,"),
            ("CACHE_TTL_SECS", "5"),
            ("COOLDOWN_SECS", "not a number"),
        ]));

        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.candidates, ["primary", "fallback"]);
        assert_eq!(settings.cache_ttl_secs, 5);
        assert_eq!(settings.cooldown_secs, 60);
        assert_eq!(settings.gateway_config().candidates.primary(), "primary");
    }

    #[test]
    fn test_switching_provider_moves_default_url() {
        let mut settings = AppSettings::default();
        settings.apply_env(env_of(&[("MODEL_PROVIDER", "openai")]));
        assert_eq!(settings.provider, ProviderKind::OpenAi);
        assert_eq!(settings.base_url, OPENAI_DEFAULT_BASE_URL);

        let mut custom = AppSettings {
            base_url: "https://proxy.example/v1".to_string(),
            ..AppSettings::default()
        };
        custom.apply_env(env_of(&[("MODEL_PROVIDER", "openai")]));
        assert_eq!(custom.base_url, "https://proxy.example/v1");
    }

    #[test]
    fn test_older_file_is_backfilled() {
        let mut settings: AppSettings =
            serde_json::from_str(r#"{"api_key": "k", "base_url": "", "candidates": []}"#).unwrap();
        settings.backfill();

        assert_eq!(settings.api_key, "k");
        assert_eq!(settings.base_url, GEMINI_BASE_URL);
        assert_eq!(settings.candidates, AppSettings::default().candidates);
    }

    #[test]
    fn test_json_round_trip_keeps_candidate_order() {
        let settings = AppSettings {
            provider: ProviderKind::OpenAi,
            candidates: vec!["b".to_string(), "a".to_string()],
            ..AppSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""provider":"openai""#));
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
