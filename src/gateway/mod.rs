//! Model gateway: model selection, dispatch and response caching.

mod cache;
mod dispatcher;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod selector;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::model::{ImagePayload, ModelProvider, ModelRequest, ModelResponse};

pub use cache::{ResponseCache, DEFAULT_CACHE_TTL};
pub use dispatcher::Dispatcher;
pub use error::{is_rate_limit_body, is_rate_limit_message, GatewayError};
pub use selector::{ModelChoice, ModelSelector, DEFAULT_CANDIDATES};

/// Configuration for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Candidate model identifiers, primary first.
    pub candidates: ModelChoice,
    /// Lifetime of cached text responses.
    pub cache_ttl: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            candidates: ModelChoice::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl GatewayConfig {
    /// Set the candidate models.
    pub fn with_candidates(mut self, candidates: ModelChoice) -> Self {
        self.candidates = candidates;
        self
    }

    /// Set the cache lifetime.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Mediates between the application and the hosted model provider.
///
/// The model is chosen lazily on first use and kept for the lifetime of the
/// gateway. A failed selection is not remembered, so a later call makes one
/// fresh pass over the candidates. Safe to share behind an [`Arc`].
///
/// # Example
///
/// ```rust,no_run
/// use study_gateway::{Gateway, GatewayConfig, ModelConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let provider = ModelConfig::default().with_api_key("key").build_provider();
///     let gateway = Gateway::new(provider, GatewayConfig::default());
///
///     let response = gateway.ask("What is a catalyst?", None).await?;
///     println!("{}", response.text);
///     Ok(())
/// }
/// ```
pub struct Gateway {
    selector: ModelSelector,
    selected: OnceCell<String>,
    dispatcher: Dispatcher,
}

impl Gateway {
    pub fn new(provider: Arc<dyn ModelProvider>, config: GatewayConfig) -> Self {
        Self {
            selector: ModelSelector::new(provider.clone(), config.candidates),
            selected: OnceCell::new(),
            dispatcher: Dispatcher::new(provider, ResponseCache::new(config.cache_ttl)),
        }
    }

    /// The selected model identifier, probing candidates on first use.
    pub async fn model(&self) -> Result<&str, GatewayError> {
        self.selected
            .get_or_try_init(|| self.selector.select())
            .await
            .map(String::as_str)
    }

    /// Send a request to the selected model.
    ///
    /// If no model can be selected, nothing is dispatched.
    pub async fn dispatch(&self, request: &ModelRequest) -> Result<ModelResponse, GatewayError> {
        let model = self.model().await?;
        self.dispatcher.dispatch(request, model).await
    }

    /// Build a request from a prompt and optional raw image bytes, then dispatch it.
    pub async fn ask(
        &self,
        prompt: &str,
        image: Option<Vec<u8>>,
    ) -> Result<ModelResponse, GatewayError> {
        let request = match image {
            Some(bytes) => ModelRequest::multimodal(prompt, ImagePayload::from_bytes(bytes)?),
            None => ModelRequest::text(prompt),
        };
        self.dispatch(&request).await
    }

    pub fn cache(&self) -> &ResponseCache {
        self.dispatcher.cache()
    }
}
