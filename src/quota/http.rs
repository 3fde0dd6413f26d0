use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use url::Url;

use super::{QuotaError, QuotaStore, UsageRecord};
use crate::types::Plan;

/// Metadata key holding the free-tier counter on the user's private metadata
pub const FREE_USAGE_KEY: &str = "freeUsage";

/// Metadata key holding the plan on the user's public metadata
pub const PLAN_KEY: &str = "plan";

#[derive(Debug, Deserialize)]
struct ProfileUser {
    #[serde(default)]
    public_metadata: Map<String, Value>,
    #[serde(default)]
    private_metadata: Map<String, Value>,
}

/// Quota store backed by the identity provider's user profile API.
///
/// `GET  {base}/users/{id}` returns the profile,
/// `PATCH {base}/users/{id}/metadata` merges metadata fields.
pub struct HttpProfileStore {
    base: Url,
    secret_key: String,
    client: Client,
}

impl HttpProfileStore {
    pub fn new(
        base_url: &str,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, QuotaError> {
        let base = Url::parse(base_url)
            .map_err(|e| QuotaError::Config(format!("identity base URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(QuotaError::Config(format!(
                "identity base URL '{}' cannot be a base",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base,
            secret_key: secret_key.into(),
            client,
        })
    }

    fn user_url(&self, user_id: &str, tail: Option<&str>) -> Result<Url, QuotaError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| QuotaError::Config("identity base URL cannot be a base".to_string()))?;
            segments.pop_if_empty().push("users").push(user_id);
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        Ok(url)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<ProfileUser, QuotaError> {
        let url = self.user_url(user_id, None)?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(QuotaError::UnknownUser(user_id.to_string()));
        }

        Ok(resp.error_for_status()?.json::<ProfileUser>().await?)
    }
}

/// Counter as stored remotely. Numbers and numeric strings are accepted;
/// negative or fractional values are clamped. Any other shape is an error,
/// never a reset to zero.
fn stored_free_usage(metadata: &Map<String, Value>) -> Result<Option<u32>, QuotaError> {
    let Some(value) = metadata.get(FREE_USAGE_KEY) else {
        return Ok(None);
    };

    let raw = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
    .ok_or_else(|| {
        QuotaError::Remote(format!("stored {} is not a number: {}", FREE_USAGE_KEY, value))
    })?;

    Ok(Some(raw.clamp(0, u32::MAX as i64) as u32))
}

#[async_trait]
impl QuotaStore for HttpProfileStore {
    async fn get_usage(&self, user_id: &str) -> Result<UsageRecord, QuotaError> {
        let profile = self.fetch_profile(user_id).await?;

        let plan = Plan::from_claim(profile.public_metadata.get(PLAN_KEY).and_then(Value::as_str));
        if plan == Plan::Premium {
            return Ok(UsageRecord::premium());
        }

        match stored_free_usage(&profile.private_metadata)? {
            Some(used) => Ok(UsageRecord::free(used)),
            None => {
                // Only reached when no value exists, so a retried request
                // that already initialised the counter reads it back instead.
                self.set_usage(user_id, 0).await?;
                tracing::info!(user_id, "initialised free usage counter");
                Ok(UsageRecord::free(0))
            }
        }
    }

    async fn set_usage(&self, user_id: &str, free_usage: u32) -> Result<(), QuotaError> {
        let url = self.user_url(user_id, Some("metadata"))?;
        let resp = self
            .client
            .patch(url)
            .bearer_auth(&self.secret_key)
            .json(&json!({ "private_metadata": { FREE_USAGE_KEY: free_usage } }))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(QuotaError::UnknownUser(user_id.to_string()));
        }
        if !resp.status().is_success() {
            return Err(QuotaError::Remote(format!(
                "metadata update for '{}' failed with {}",
                user_id,
                resp.status()
            )));
        }
        Ok(())
    }
}
