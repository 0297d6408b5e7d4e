// [libs/core/policy-engine/src/report.rs]
use crate::context::PolicyContext;
use crate::rule::{PolicyRule, PolicySeverity};
use aegis_domain_models::Decision;

/// Outcome of running the full rule set against one decision. `passed`
/// is false only when at least one `Error`-severity rule failed —
/// `Warn` failures surface in `warnings` without blocking execution.
#[derive(Debug, Clone)]
pub struct PolicyReport {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub applied_rules: Vec<&'static str>,
}

impl PolicyReport {
    pub fn is_sponsorship_clear(&self) -> bool {
        self.passed
    }
}

/// Runs every rule in order against `decision`. Non-sponsorship decisions
/// walk the same rule list so callers always get a uniform report shape,
/// but each sponsorship-specific rule recognizes this via
/// `Decision::sponsor_params` returning `None` and reports a pass with no
/// side effects — no counter is touched, no lookup performed.
///
/// Evaluation runs in two passes: a probe pass with `ctx.record = false`
/// that answers whether every rule would pass without consuming any
/// sliding-window quota, and — only if the probe clears — a commit pass
/// with `ctx.record = true` that actually records the admission. A
/// decision rejected by any error-severity rule never touches a counter.
pub async fn evaluate(
    rules: &[Box<dyn PolicyRule>],
    decision: &Decision,
    ctx: &PolicyContext<'_>,
) -> PolicyReport {
    let probe_ctx = ctx.with_record(false);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut applied_rules = Vec::new();

    for rule in rules {
        let outcome = rule.validate(decision, &probe_ctx).await;
        applied_rules.push(rule.name());

        if outcome.passed {
            continue;
        }

        let annotated = format!("[{}] {}", rule.name(), outcome.message);
        match rule.severity() {
            PolicySeverity::Error => errors.push(annotated),
            PolicySeverity::Warn => warnings.push(annotated),
        }
    }

    if errors.is_empty() {
        let commit_ctx = ctx.with_record(true);
        for rule in rules {
            rule.validate(decision, &commit_ctx).await;
        }
    }

    PolicyReport {
        passed: errors.is_empty(),
        errors,
        warnings,
        applied_rules,
    }
}
