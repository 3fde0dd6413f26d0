pub mod accountant;
pub mod gate;

pub use accountant::{record_success, UsageAccountant};
pub use gate::{Decision, DenyReason, PlanGate, DEFAULT_FREE_USAGE_LIMIT};
