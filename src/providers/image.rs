use async_trait::async_trait;
use reqwest::{multipart::Form, Client};
use std::time::Duration;

use super::{error_body, require, ImageGenerator, ProviderError};

const PROVIDER: &str = "text-to-image";

/// Text-to-image API taking a multipart `prompt` field and answering with
/// the encoded image
pub struct TextToImageClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl TextToImageClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl ImageGenerator for TextToImageClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        require(PROVIDER, "IMAGE_API_KEY", &self.api_key)?;

        let form = Form::new().text("prompt", prompt.to_string());

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: resp.status().as_u16(),
                body: error_body(resp).await,
            });
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::InvalidResponse {
                provider: PROVIDER,
                message: "empty image".to_string(),
            });
        }
        Ok(bytes.to_vec())
    }
}
