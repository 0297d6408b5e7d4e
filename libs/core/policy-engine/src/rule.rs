// [libs/core/policy-engine/src/rule.rs]
use crate::context::PolicyContext;
use aegis_domain_models::Decision;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySeverity {
    Error,
    Warn,
}

#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub passed: bool,
    pub message: String,
}

impl RuleOutcome {
    pub fn pass() -> Self {
        Self { passed: true, message: "N/A".to_string() }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { passed: false, message: message.into() }
    }
}

/// One ordered, composable check in the sponsorship pipeline. Iteration
/// order across the registered rule set is part of the contract: rules
/// 5-7 (the sliding-window checks) only have a side effect when they
/// themselves pass, so order does not affect fairness, but it does
/// determine which single error surfaces first in tests that assert on
/// scenario-specific rule names.
#[async_trait]
pub trait PolicyRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn severity(&self) -> PolicySeverity;
    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome;
}
