use thiserror::Error;

use crate::types::{FeatureTier, Plan};

/// Number of standard-tier requests a free account may make
pub const DEFAULT_FREE_USAGE_LIMIT: u32 = 10;

/// Why the gate refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("This feature is only available for premium subscriptions")]
    PlanRequired,

    #[error("Free usage limit exceeded. Upgrade to premium for more requests.")]
    QuotaExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Pure plan x quota decision, evaluated before any external call
#[derive(Debug, Clone, Copy)]
pub struct PlanGate {
    free_usage_limit: u32,
}

impl Default for PlanGate {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_USAGE_LIMIT)
    }
}

impl PlanGate {
    pub fn new(free_usage_limit: u32) -> Self {
        Self { free_usage_limit }
    }

    pub fn free_usage_limit(&self) -> u32 {
        self.free_usage_limit
    }

    pub fn can_proceed(&self, plan: Plan, free_usage: u32, tier: FeatureTier) -> Decision {
        match (plan, tier) {
            (Plan::Premium, _) => Decision::Allowed,
            (Plan::Free, FeatureTier::PremiumOnly) => Decision::Denied(DenyReason::PlanRequired),
            (Plan::Free, FeatureTier::Standard) if free_usage >= self.free_usage_limit => {
                Decision::Denied(DenyReason::QuotaExceeded)
            }
            (Plan::Free, FeatureTier::Standard) => Decision::Allowed,
        }
    }
}
