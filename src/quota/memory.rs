use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{QuotaError, QuotaStore, UsageRecord};
use crate::types::Plan;

#[derive(Debug, Clone)]
struct Profile {
    plan: Plan,
    free_usage: Option<u32>,
}

/// Process-local quota store, used by tests
pub struct MemoryQuotaStore {
    profiles: Mutex<HashMap<String, Profile>>,
    writes: Mutex<u64>,
    atomic_increment: bool,
}

impl Default for MemoryQuotaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            writes: Mutex::new(0),
            atomic_increment: true,
        }
    }

    /// Behave like the remote profile service: only read and replace
    pub fn without_atomic_increment() -> Self {
        Self {
            atomic_increment: false,
            ..Self::new()
        }
    }

    /// Register a user; `free_usage = None` means no counter stored yet
    pub async fn insert_user(&self, user_id: &str, plan: Plan, free_usage: Option<u32>) {
        self.profiles
            .lock()
            .await
            .insert(user_id.to_string(), Profile { plan, free_usage });
    }

    /// Stored counter without triggering initialisation
    pub async fn stored_usage(&self, user_id: &str) -> Option<u32> {
        self.profiles
            .lock()
            .await
            .get(user_id)
            .and_then(|p| p.free_usage)
    }

    /// Number of counter writes performed so far
    pub async fn write_count(&self) -> u64 {
        *self.writes.lock().await
    }

    async fn bump_writes(&self) {
        *self.writes.lock().await += 1;
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn get_usage(&self, user_id: &str) -> Result<UsageRecord, QuotaError> {
        let initialised = {
            let mut profiles = self.profiles.lock().await;
            let profile = profiles
                .get_mut(user_id)
                .ok_or_else(|| QuotaError::UnknownUser(user_id.to_string()))?;

            if profile.plan == Plan::Premium {
                return Ok(UsageRecord::premium());
            }

            match profile.free_usage {
                Some(used) => return Ok(UsageRecord::free(used)),
                None => {
                    profile.free_usage = Some(0);
                    true
                }
            }
        };

        if initialised {
            tracing::debug!(user_id, "initialised free usage counter");
            self.bump_writes().await;
        }
        Ok(UsageRecord::free(0))
    }

    async fn set_usage(&self, user_id: &str, free_usage: u32) -> Result<(), QuotaError> {
        {
            let mut profiles = self.profiles.lock().await;
            let profile = profiles
                .get_mut(user_id)
                .ok_or_else(|| QuotaError::UnknownUser(user_id.to_string()))?;
            profile.free_usage = Some(free_usage);
        }
        self.bump_writes().await;
        Ok(())
    }

    async fn increment_usage(&self, user_id: &str) -> Result<u32, QuotaError> {
        if !self.atomic_increment {
            return Err(QuotaError::Unsupported);
        }

        let next = {
            let mut profiles = self.profiles.lock().await;
            let profile = profiles
                .get_mut(user_id)
                .ok_or_else(|| QuotaError::UnknownUser(user_id.to_string()))?;
            let next = profile.free_usage.unwrap_or(0).saturating_add(1);
            profile.free_usage = Some(next);
            next
        };
        self.bump_writes().await;
        Ok(next)
    }
}
