//! Construction of the production adapters from [`AppConfig`].

use std::sync::Arc;

use crate::config::{AppConfig, ProviderConfig};
use crate::gateway::{Gateway, Providers};
use crate::ledger::CreationLedger;
use crate::metering::PlanGate;
use crate::providers::{
    ChatCompletionsClient, MediaHostClient, PdfTextReader, ProviderError, TextToImageClient,
};
use crate::quota::{HttpProfileStore, QuotaError, QuotaStore};

/// HTTP clients for every backend. Missing credentials surface on first use.
pub fn providers(config: &ProviderConfig) -> Result<Providers, ProviderError> {
    let timeout = config.call_timeout();

    Ok(Providers {
        text: Arc::new(ChatCompletionsClient::new(
            &config.llm_base_url,
            config.llm_api_key.clone(),
            config.llm_model.clone(),
            config.llm_temperature,
            timeout,
        )?),
        image: Arc::new(TextToImageClient::new(
            config.image_api_url.clone(),
            config.image_api_key.clone(),
            timeout,
        )?),
        media: Arc::new(MediaHostClient::new(
            &config.media_api_base,
            &config.media_delivery_base,
            &config.media_cloud_name,
            config.media_api_key.clone(),
            config.media_api_secret.clone(),
            timeout,
        )?),
        documents: Arc::new(PdfTextReader),
    })
}

pub fn quota_store(config: &AppConfig) -> Result<HttpProfileStore, QuotaError> {
    if config.identity.secret_key.trim().is_empty() {
        tracing::warn!("IDENTITY_SECRET_KEY is not set; profile lookups will be rejected");
    }
    HttpProfileStore::new(
        &config.identity.base_url,
        config.identity.secret_key.clone(),
        config.providers.call_timeout(),
    )
}

/// Gateway wired with the configured quota limit, upload limits and call timeout
pub fn gateway(
    config: &AppConfig,
    quota: Arc<dyn QuotaStore>,
    ledger: Arc<dyn CreationLedger>,
    providers: Providers,
) -> Gateway {
    Gateway::new(quota, ledger, providers)
        .with_gate(PlanGate::new(config.quota.free_usage_limit))
        .with_limits(config.api.upload_limits())
        .with_call_timeout(config.providers.call_timeout())
}
