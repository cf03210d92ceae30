//! Outbound seam to a hosted model API.

use async_trait::async_trait;
use thiserror::Error;

use super::request::ModelRequest;

/// Prompt sent when probing whether a model identifier is servable.
pub const PROBE_PROMPT: &str = "ping";

/// Errors reported by a model provider.
///
/// The `Display` text of these errors is what the gateway inspects for
/// rate-limit markers, so API errors keep the HTTP status and raw body.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("{status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// A hosted generative model API.
///
/// Implementations turn a [`ModelRequest`] into text. They never retry and
/// never cache; both concerns belong to the gateway and its callers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Generate text for `request` using `model`.
    ///
    /// `max_output_tokens` caps the generation when set.
    async fn generate(
        &self,
        model: &str,
        request: &ModelRequest,
        max_output_tokens: Option<u32>,
    ) -> Result<String, ProviderError>;

    /// Minimal-cost call verifying `model` currently accepts requests.
    async fn probe(&self, model: &str) -> Result<(), ProviderError> {
        self.generate(model, &ModelRequest::text(PROBE_PROMPT), Some(1))
            .await
            .map(|_| ())
    }
}
