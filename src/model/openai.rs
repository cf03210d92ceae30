//! Provider for OpenAI-compatible chat completion APIs.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::{ModelProvider, ProviderError};
use super::request::ModelRequest;

/// OpenAI API response structures.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// Client for OpenAI-compatible endpoints (vLLM, DeepSeek, OpenRouter, ...).
pub struct OpenAiCompatibleProvider {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Create a user message with optional image.
    ///
    /// # Arguments
    /// * `request` - Prompt and optional image.
    ///
    /// # Returns
    /// Message as JSON Value.
    fn create_user_message(request: &ModelRequest) -> Value {
        let mut content = vec![json!({
            "type": "text",
            "text": request.prompt()
        })];

        if let Some(image) = request.image() {
            content.push(json!({
                "type": "image_url",
                "image_url": {
                    "url": image.to_data_url()
                }
            }));
        }

        json!({
            "role": "user",
            "content": content
        })
    }

    fn build_body(model: &str, request: &ModelRequest, max_tokens: Option<u32>) -> Value {
        let mut body = json!({
            "model": model,
            "messages": [Self::create_user_message(request)],
        });
        if let (Some(max_tokens), Value::Object(map)) = (max_tokens, &mut body) {
            map.insert("max_tokens".to_string(), json!(max_tokens));
        }
        body
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn generate(
        &self,
        model: &str,
        request: &ModelRequest,
        max_output_tokens: Option<u32>,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_body(model, request, max_output_tokens);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| ProviderError::ParseError("No choices in response".to_string()))
    }
}
