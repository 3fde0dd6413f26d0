//! Per-user usage counter and plan, owned by the identity/profile service.
//!
//! The counter is a plain value on the user's profile. `set_usage` replaces
//! it, so two concurrent requests from the same free user that both read `N`
//! will both write `N + 1` and one increment is lost. Stores that can do
//! better override [`QuotaStore::increment_usage`]; callers fall back to
//! read-then-set when it returns [`QuotaError::Unsupported`].

pub mod http;
pub mod memory;

pub use http::HttpProfileStore;
pub use memory::MemoryQuotaStore;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::types::Plan;

/// Plan and free-tier counter for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub plan: Plan,
    /// Only meaningful when `plan` is free
    pub free_usage: u32,
}

impl UsageRecord {
    pub fn free(free_usage: u32) -> Self {
        Self { plan: Plan::Free, free_usage }
    }

    pub fn premium() -> Self {
        Self { plan: Plan::Premium, free_usage: 0 }
    }
}

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Atomic increment is not supported by this store")]
    Unsupported,

    #[error("Invalid identity service configuration: {0}")]
    Config(String),

    #[error("Identity service error: {0}")]
    Remote(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Reads plan and counter. A free user without a stored counter gets it
    /// initialised to 0; an existing value is never overwritten.
    async fn get_usage(&self, user_id: &str) -> Result<UsageRecord, QuotaError>;

    /// Replaces the stored counter with `free_usage`.
    async fn set_usage(&self, user_id: &str, free_usage: u32) -> Result<(), QuotaError>;

    /// Atomically adds one to the stored counter and returns the new value.
    async fn increment_usage(&self, _user_id: &str) -> Result<u32, QuotaError> {
        Err(QuotaError::Unsupported)
    }
}
