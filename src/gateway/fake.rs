//! Scripted provider for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{ModelProvider, ModelRequest, ProviderError};

/// Provider that answers `answer #<n> from <model>: <prompt>` and records calls.
#[derive(Default)]
pub(crate) struct FakeProvider {
    failing_probes: Vec<String>,
    failure: Option<(u16, String)>,
    reply: Option<String>,
    generate_calls: AtomicUsize,
    probed: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make probes of `model` fail.
    pub(crate) fn failing_probe(mut self, model: &str) -> Self {
        self.failing_probes.push(model.to_string());
        self
    }

    /// Make every generate call fail with an API error.
    pub(crate) fn failing_with(mut self, status: u16, body: &str) -> Self {
        self.failure = Some((status, body.to_string()));
        self
    }

    /// Answer every generate call with `text`.
    pub(crate) fn replying(mut self, text: &str) -> Self {
        self.reply = Some(text.to_string());
        self
    }

    pub(crate) fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(
        &self,
        model: &str,
        request: &ModelRequest,
        _max_output_tokens: Option<u32>,
    ) -> Result<String, ProviderError> {
        let n = self.generate_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((status, body)) = &self.failure {
            return Err(ProviderError::Api {
                status: *status,
                body: body.clone(),
            });
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }
        Ok(format!("answer #{} from {}: {}", n, model, request.prompt()))
    }

    async fn probe(&self, model: &str) -> Result<(), ProviderError> {
        // Let concurrent callers interleave as they would over the network.
        tokio::task::yield_now().await;
        self.probed.lock().unwrap().push(model.to_string());
        if self.failing_probes.iter().any(|m| m == model) {
            return Err(ProviderError::Api {
                status: 404,
                body: format!("models/{} is not found", model),
            });
        }
        Ok(())
    }
}
