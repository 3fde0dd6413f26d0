//! Per-request orchestration of gate, provider, ledger and usage accounting.
//!
//! Within one request the order is fixed: usage lookup, gate check, provider
//! call, ledger append, usage update. A denied or failed request never
//! reaches the ledger or the counter. Bookkeeping failures after a
//! successful provider call are logged and the content is still returned.

pub mod request;

pub use request::{GenerationRequest, UploadLimits};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::database::NewCreation;
use crate::ledger::CreationLedger;
use crate::metering::{Decision, DenyReason, PlanGate, UsageAccountant};
use crate::providers::{
    CompletionRequest, DocumentReader, ImageEdit, ImageGenerator, MediaHost, ProviderError,
    TextGenerator, Upload,
};
use crate::quota::{QuotaError, QuotaStore, UsageRecord};
use request::{resume_review_prompt, BLOG_TITLE_MAX_TOKENS, RESUME_REVIEW_MAX_TOKENS};

/// Default bound on any single external call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Denied(#[from] DenyReason),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Usage lookup failed: {0}")]
    QuotaUnavailable(#[source] QuotaError),

    #[error("{operation} failed: {source}")]
    Provider {
        operation: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

/// Generation and media backends used by the gateway
#[derive(Clone)]
pub struct Providers {
    pub text: Arc<dyn TextGenerator>,
    pub image: Arc<dyn ImageGenerator>,
    pub media: Arc<dyn MediaHost>,
    pub documents: Arc<dyn DocumentReader>,
}

/// Result handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub content: String,
    /// `None` when the ledger append failed
    pub creation_id: Option<i64>,
    /// Counter after this request; `None` for premium users or when the
    /// update failed
    pub free_usage: Option<u32>,
}

pub struct Gateway {
    quota: Arc<dyn QuotaStore>,
    ledger: Arc<dyn CreationLedger>,
    providers: Providers,
    gate: PlanGate,
    limits: UploadLimits,
    call_timeout: Duration,
}

impl Gateway {
    pub fn new(
        quota: Arc<dyn QuotaStore>,
        ledger: Arc<dyn CreationLedger>,
        providers: Providers,
    ) -> Self {
        Self {
            quota,
            ledger,
            providers,
            gate: PlanGate::default(),
            limits: UploadLimits::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_gate(mut self, gate: PlanGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn ledger(&self) -> &dyn CreationLedger {
        self.ledger.as_ref()
    }

    pub fn quota(&self) -> &dyn QuotaStore {
        self.quota.as_ref()
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    pub async fn execute(
        &self,
        user_id: &str,
        request: GenerationRequest,
    ) -> Result<Generated, GatewayError> {
        let operation = request.operation();
        request.validate(&self.limits).map_err(GatewayError::InvalidInput)?;

        let usage = self.lookup_usage(user_id).await?;

        if let Decision::Denied(reason) =
            self.gate.can_proceed(usage.plan, usage.free_usage, request.tier())
        {
            info!(
                user_id,
                operation,
                plan = %usage.plan,
                free_usage = usage.free_usage,
                %reason,
                "request denied"
            );
            return Err(reason.into());
        }

        let entry = NewCreation {
            user_id: user_id.to_string(),
            prompt: request.ledger_prompt(),
            content: String::new(),
            kind: request.kind(),
            publish: request.publish(),
        };

        let content = self.produce(request).await?;

        let creation_id = self
            .record_creation(NewCreation {
                content: content.clone(),
                ..entry
            })
            .await;
        let free_usage = self.record_usage(user_id, &usage).await;

        info!(user_id, operation, ?creation_id, ?free_usage, "generation completed");

        Ok(Generated {
            content,
            creation_id,
            free_usage,
        })
    }

    async fn lookup_usage(&self, user_id: &str) -> Result<UsageRecord, GatewayError> {
        match self.bounded("usage lookup", self.quota.get_usage(user_id)).await? {
            Ok(usage) => Ok(usage),
            Err(QuotaError::UnknownUser(id)) => Err(GatewayError::UnknownUser(id)),
            Err(e) => {
                error!(user_id, error = %e, "usage lookup failed");
                Err(GatewayError::QuotaUnavailable(e))
            }
        }
    }

    async fn produce(&self, request: GenerationRequest) -> Result<String, GatewayError> {
        let operation = request.operation();

        match request {
            GenerationRequest::Article { prompt, length } => {
                let completion = CompletionRequest {
                    prompt,
                    max_tokens: length,
                };
                self.call(operation, self.providers.text.complete(completion))
                    .await
            }
            GenerationRequest::BlogTitle { prompt } => {
                let completion = CompletionRequest {
                    prompt,
                    max_tokens: BLOG_TITLE_MAX_TOKENS,
                };
                self.call(operation, self.providers.text.complete(completion))
                    .await
            }
            GenerationRequest::Image { prompt, .. } => {
                let bytes = self
                    .call(operation, self.providers.image.generate(&prompt))
                    .await?;
                let image = Upload {
                    file_name: "generated.png".to_string(),
                    content_type: "image/png".to_string(),
                    bytes,
                };
                self.call(operation, self.providers.media.upload(image, ImageEdit::None))
                    .await
            }
            GenerationRequest::RemoveBackground { image } => {
                self.call(
                    operation,
                    self.providers.media.upload(image, ImageEdit::RemoveBackground),
                )
                .await
            }
            GenerationRequest::RemoveObject { image, object } => {
                let edit = ImageEdit::RemoveObject(object.trim().to_string());
                self.call(operation, self.providers.media.upload(image, edit))
                    .await
            }
            GenerationRequest::ResumeReview { resume } => {
                let extracted = self
                    .bounded(operation, self.providers.documents.extract_text(resume))
                    .await?;
                let text = match extracted {
                    Ok(text) => text,
                    Err(ProviderError::Document(reason)) => {
                        warn!(reason = %reason, "unreadable resume upload");
                        return Err(GatewayError::InvalidInput(
                            "Could not read the uploaded PDF".to_string(),
                        ));
                    }
                    Err(source) => return Err(GatewayError::Provider { operation, source }),
                };

                if text.trim().is_empty() {
                    return Err(GatewayError::InvalidInput(
                        "No text could be extracted from the resume".to_string(),
                    ));
                }

                let completion = CompletionRequest {
                    prompt: resume_review_prompt(&text),
                    max_tokens: RESUME_REVIEW_MAX_TOKENS,
                };
                self.call(operation, self.providers.text.complete(completion))
                    .await
            }
        }
    }

    async fn record_creation(&self, entry: NewCreation) -> Option<i64> {
        let user_id = entry.user_id.clone();
        let kind = entry.kind;

        match self.bounded("ledger append", self.ledger.append(entry)).await {
            Ok(Ok(creation)) => Some(creation.id),
            Ok(Err(e)) => {
                error!(user_id = %user_id, %kind, error = %e, "failed to record creation");
                None
            }
            Err(e) => {
                error!(user_id = %user_id, %kind, error = %e, "failed to record creation");
                None
            }
        }
    }

    async fn record_usage(&self, user_id: &str, usage: &UsageRecord) -> Option<u32> {
        let commit = UsageAccountant::commit(self.quota.as_ref(), user_id, usage);

        match self.bounded("usage update", commit).await {
            Ok(Ok(stored)) => stored,
            Ok(Err(e)) => {
                error!(user_id, free_usage = usage.free_usage, error = %e, "failed to update usage");
                None
            }
            Err(e) => {
                error!(user_id, free_usage = usage.free_usage, error = %e, "failed to update usage");
                None
            }
        }
    }

    /// Provider call bounded by the call timeout
    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, GatewayError> {
        match self.bounded(operation, fut).await? {
            Ok(value) => Ok(value),
            Err(source) => {
                error!(operation, error = %source, "provider call failed");
                Err(GatewayError::Provider { operation, source })
            }
        }
    }

    async fn bounded<F: Future>(
        &self,
        operation: &'static str,
        fut: F,
    ) -> Result<F::Output, GatewayError> {
        tokio::time::timeout(self.call_timeout, fut)
            .await
            .map_err(|_| {
                warn!(operation, after = ?self.call_timeout, "external call timed out");
                GatewayError::Timeout {
                    operation,
                    after: self.call_timeout,
                }
            })
    }
}
