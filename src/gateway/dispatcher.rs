//! Request dispatch and outcome normalization.

use std::sync::Arc;
use std::time::Instant;

use crate::model::{ModelProvider, ModelRequest, ModelResponse};

use super::cache::ResponseCache;
use super::error::GatewayError;

/// Sends requests to the selected model, memoizing text responses.
pub struct Dispatcher {
    provider: Arc<dyn ModelProvider>,
    cache: ResponseCache,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn ModelProvider>, cache: ResponseCache) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Send `request` to `model`.
    ///
    /// Text prompts are answered from cache while fresh. Image requests always
    /// reach the provider. Failures are classified, never retried.
    pub async fn dispatch(
        &self,
        request: &ModelRequest,
        model: &str,
    ) -> Result<ModelResponse, GatewayError> {
        if let Some(key) = request.cache_key() {
            if let Some(cached) = self.cache.get(key) {
                tracing::debug!(model, "Serving response from cache");
                return Ok(cached);
            }
        }

        let started_at = Instant::now();
        let result = self.provider.generate(model, request, None).await;
        let elapsed_ms = started_at.elapsed().as_millis();

        match result {
            Ok(text) => {
                tracing::info!(
                    provider = self.provider.name(),
                    model,
                    has_image = request.image().is_some(),
                    elapsed_ms,
                    "Model call succeeded"
                );
                let response = ModelResponse::new(text);
                // Empty answers (e.g. safety-filtered candidates) are never cached.
                if let Some(key) = request.cache_key().filter(|_| !response.text.is_empty()) {
                    self.cache.insert(key, response.clone());
                }
                Ok(response)
            }
            Err(e) => {
                let error = GatewayError::from(e);
                tracing::warn!(
                    provider = self.provider.name(),
                    model,
                    elapsed_ms,
                    "Model call failed: {}",
                    error
                );
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeProvider;
    use crate::model::{ImagePayload, PNG_MAGIC};
    use std::time::Duration;

    fn dispatcher(provider: &Arc<FakeProvider>, ttl: Duration) -> Dispatcher {
        Dispatcher::new(provider.clone(), ResponseCache::new(ttl))
    }

    #[tokio::test]
    async fn test_repeat_prompt_served_from_cache() {
        let provider = Arc::new(FakeProvider::new());
        let dispatcher = dispatcher(&provider, Duration::from_secs(600));
        let request = ModelRequest::text("What is a catalyst?");

        let first = dispatcher.dispatch(&request, "primary").await.unwrap();
        let second = dispatcher.dispatch(&request, "primary").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.generate_calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_fresh_call() {
        let provider = Arc::new(FakeProvider::new());
        let dispatcher = dispatcher(&provider, Duration::from_millis(20));
        let request = ModelRequest::text("What is a catalyst?");

        let first = dispatcher.dispatch(&request, "primary").await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        let second = dispatcher.dispatch(&request, "primary").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(provider.generate_calls(), 2);
    }

    #[tokio::test]
    async fn test_multimodal_bypasses_cache() {
        let provider = Arc::new(FakeProvider::new());
        let dispatcher = dispatcher(&provider, Duration::from_secs(600));
        let prompt = "Summarize these notes";

        dispatcher
            .dispatch(&ModelRequest::text(prompt), "primary")
            .await
            .unwrap();

        let image = ImagePayload::from_bytes(PNG_MAGIC.to_vec()).unwrap();
        let request = ModelRequest::multimodal(prompt, image);
        dispatcher.dispatch(&request, "primary").await.unwrap();
        dispatcher.dispatch(&request, "primary").await.unwrap();

        assert_eq!(provider.generate_calls(), 3);
        assert_eq!(dispatcher.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_answer_not_cached() {
        let provider = Arc::new(FakeProvider::new().replying(""));
        let dispatcher = dispatcher(&provider, Duration::from_secs(600));
        let request = ModelRequest::text("What is a catalyst?");

        let first = dispatcher.dispatch(&request, "primary").await.unwrap();
        dispatcher.dispatch(&request, "primary").await.unwrap();

        assert_eq!(first.text, "");
        assert_eq!(provider.generate_calls(), 2);
        assert!(dispatcher.cache().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_classified() {
        let provider =
            Arc::new(FakeProvider::new().failing_with(429, "Resource has been exhausted"));
        let dispatcher = dispatcher(&provider, Duration::from_secs(600));

        let err = dispatcher
            .dispatch(&ModelRequest::text("q"), "primary")
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::RateLimited);
    }

    #[tokio::test]
    async fn test_other_failure_keeps_message() {
        let provider = Arc::new(FakeProvider::new().failing_with(400, "Unsupported MIME type"));
        let dispatcher = dispatcher(&provider, Duration::from_secs(600));

        let err = dispatcher
            .dispatch(&ModelRequest::text("q"), "primary")
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::unknown("400: Unsupported MIME type"));
        assert!(dispatcher.cache().is_empty());
    }
}
