//! Model request types and provider clients for AI inference.

mod config;
mod gemini;
mod openai;
mod provider;
mod request;

pub use config::{ModelConfig, ProviderKind};
pub use gemini::{GeminiProvider, GEMINI_BASE_URL};
pub use openai::OpenAiCompatibleProvider;
pub use provider::{ModelProvider, ProviderError, PROBE_PROMPT};
pub use request::{ImageError, ImagePayload, ModelRequest, ModelResponse};

#[cfg(test)]
pub(crate) use request::tests::PNG_MAGIC;
