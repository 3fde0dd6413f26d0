//! External generation and media providers.
//!
//! Each provider sits behind a narrow trait so the gateway can be exercised
//! with scripted implementations.

pub mod chat;
pub mod document;
pub mod image;
pub mod media;

pub use chat::ChatCompletionsClient;
pub use document::PdfTextReader;
pub use image::TextToImageClient;
pub use media::MediaHostClient;

use async_trait::async_trait;
use thiserror::Error;

/// Fails with [`ProviderError::NotConfigured`] when `value` is blank
pub(crate) fn require(
    provider: &'static str,
    setting: &'static str,
    value: &str,
) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::NotConfigured { provider, setting });
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is not configured: missing {setting}")]
    NotConfigured {
        provider: &'static str,
        setting: &'static str,
    },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unusable response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("Document could not be read: {0}")]
    Document(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// File received from a client upload
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

/// Transformation applied by the media host on upload
#[derive(Debug, Clone, PartialEq)]
pub enum ImageEdit {
    None,
    RemoveBackground,
    RemoveObject(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Encoded image bytes for `prompt`
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Store an image and return its public URL
    async fn upload(&self, image: Upload, edit: ImageEdit) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait DocumentReader: Send + Sync {
    async fn extract_text(&self, document: Upload) -> Result<String, ProviderError>;
}

/// Response body text for error reports, truncated
pub(crate) async fn error_body(resp: reqwest::Response) -> String {
    const LIMIT: usize = 512;
    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > LIMIT {
        let mut cut = LIMIT;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
