use crate::quota::{QuotaError, QuotaStore, UsageRecord};
use crate::types::Plan;

/// Counter value after one successful billable operation, or `None` when the
/// plan is not metered.
pub fn record_success(plan: Plan, current: u32) -> Option<u32> {
    match plan {
        Plan::Premium => None,
        Plan::Free => Some(current.saturating_add(1)),
    }
}

/// Applies [`record_success`] to a quota store.
///
/// Must only be called after the billable call has succeeded. Uses the
/// store's atomic increment when available; otherwise writes the value
/// computed from `usage`, which was read at the start of the request.
pub struct UsageAccountant;

impl UsageAccountant {
    pub async fn commit(
        store: &dyn QuotaStore,
        user_id: &str,
        usage: &UsageRecord,
    ) -> Result<Option<u32>, QuotaError> {
        let Some(next) = record_success(usage.plan, usage.free_usage) else {
            return Ok(None);
        };

        match store.increment_usage(user_id).await {
            Ok(stored) => Ok(Some(stored)),
            Err(QuotaError::Unsupported) => {
                store.set_usage(user_id, next).await?;
                Ok(Some(next))
            }
            Err(e) => Err(e),
        }
    }
}
