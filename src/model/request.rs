//! Request and response types passed through the gateway.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::ImageFormat;
use thiserror::Error;

/// Image payload errors.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image: {0}")]
    ReadFailed(#[from] std::io::Error),
    #[error("Unrecognized image data: {0}")]
    Unrecognized(String),
    #[error("Unsupported image format: {0:?}")]
    UnsupportedFormat(ImageFormat),
}

/// Raw image bytes together with their detected MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl ImagePayload {
    /// Wrap raw image bytes, sniffing the format from the data itself.
    ///
    /// Only formats the hosted vision models accept are allowed:
    /// PNG, JPEG, WebP and GIF.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        let format =
            image::guess_format(&bytes).map_err(|e| ImageError::Unrecognized(e.to_string()))?;
        let mime_type = match format {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            other => return Err(ImageError::UnsupportedFormat(other)),
        };
        Ok(Self { bytes, mime_type })
    }

    /// Read an image file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Base64 (standard alphabet, padded) encoding of the image bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:` URL form used by OpenAI-compatible vision endpoints.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// A single request to the hosted model.
///
/// Requests are immutable once built; the gateway only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRequest {
    /// Plain text prompt. Eligible for response caching.
    Text { prompt: String },
    /// Prompt plus an image. Never cached.
    Multimodal { prompt: String, image: ImagePayload },
}

impl ModelRequest {
    /// Create a text-only request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self::Text {
            prompt: prompt.into(),
        }
    }

    /// Create a prompt + image request.
    pub fn multimodal(prompt: impl Into<String>, image: ImagePayload) -> Self {
        Self::Multimodal {
            prompt: prompt.into(),
            image,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::Text { prompt } | Self::Multimodal { prompt, .. } => prompt,
        }
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        match self {
            Self::Text { .. } => None,
            Self::Multimodal { image, .. } => Some(image),
        }
    }

    /// Key under which the response may be memoized, if any.
    pub fn cache_key(&self) -> Option<&str> {
        match self {
            Self::Text { prompt } => Some(prompt),
            Self::Multimodal { .. } => None,
        }
    }
}

/// Successful model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
}

impl ModelResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
