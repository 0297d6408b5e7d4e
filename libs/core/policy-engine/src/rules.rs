// [libs/core/policy-engine/src/rules.rs]
use crate::context::PolicyContext;
use crate::rule::{PolicyRule, PolicySeverity, RuleOutcome};
use aegis_abuse_detection::check_abuse;
use aegis_domain_models::{keys, Decision};
use aegis_rate_limit::SlidingWindowCounter;
use async_trait::async_trait;
use std::time::Duration;

/// Consults a sliding window under `ctx.record`: when false (a fairness
/// probe) this only reads the window's current occupancy; when true it
/// performs the real check-and-append. Keeping both paths behind one
/// helper keeps every rate-limit rule's probe and commit behavior in sync.
async fn admit(ctx: &PolicyContext<'_>, key: &str, window: Duration, quota: usize) -> bool {
    if ctx.record {
        SlidingWindowCounter::check_and_record(ctx.store, key, window, quota).await
    } else {
        SlidingWindowCounter::count_in_window(ctx.store, key, window)
            .await
            .unwrap_or(0)
            < quota
    }
}

macro_rules! skip_if_not_sponsorship {
    ($decision:expr) => {
        match $decision.sponsor_params() {
            Some(params) => params,
            None => return RuleOutcome::pass(),
        }
    };
}

pub struct LegitimacyRule;

#[async_trait]
impl PolicyRule for LegitimacyRule {
    fn name(&self) -> &'static str {
        "legitimacy"
    }
    fn description(&self) -> &'static str {
        "Agent must clear abuse screening and show established on-chain standing or gas-passport qualification"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        let params = skip_if_not_sponsorship!(decision);

        let verdict = check_abuse(
            ctx.store,
            ctx.abuse_config,
            ctx.history_provider,
            &params.agent_wallet_address,
        )
        .await;
        if verdict.is_abusive() {
            return RuleOutcome::fail(format!("agent failed abuse screening ({verdict:?})"));
        }

        let tx_count_ok = ctx.agent_tx_count.unwrap_or(0) >= ctx.config.legitimacy_min_tx_count;
        let passport_ok = ctx
            .gas_passport
            .map(|passport| {
                passport.sponsor_count >= ctx.config.gas_passport_preferential_min_sponsorships
                    && passport.success_rate_bps >= ctx.config.gas_passport_preferential_min_success_bps
            })
            .unwrap_or(false);

        if tx_count_ok || passport_ok {
            RuleOutcome::pass()
        } else {
            RuleOutcome::fail("agent lacks sufficient on-chain history and does not qualify via gas passport")
        }
    }
}

pub struct ApprovedAgentRule;

#[async_trait]
impl PolicyRule for ApprovedAgentRule {
    fn name(&self) -> &'static str {
        "approved-agent"
    }
    fn description(&self) -> &'static str {
        "When approval mode is enabled, the agent must hold a live, unrevoked approval with daily budget headroom"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        if !ctx.config.require_agent_approval {
            return RuleOutcome::pass();
        }
        let params = skip_if_not_sponsorship!(decision);

        match &ctx.agent_approval {
            Err(dependency) => RuleOutcome::fail(format!("approval lookup unavailable: {dependency}")),
            Ok(None) => RuleOutcome::fail("no approval on record for this agent/protocol pair"),
            Ok(Some(approval)) => {
                if approval.revoked {
                    return RuleOutcome::fail("approval has been revoked");
                }
                if approval.running_daily_spend_usd + params.estimated_cost_usd > approval.daily_budget_usd {
                    return RuleOutcome::fail("approved daily budget would be exceeded");
                }
                RuleOutcome::pass()
            }
        }
    }
}

pub struct ProtocolBudgetRule;

#[async_trait]
impl PolicyRule for ProtocolBudgetRule {
    fn name(&self) -> &'static str {
        "protocol-budget"
    }
    fn description(&self) -> &'static str {
        "The sponsoring protocol must have a recorded budget that covers the estimated cost"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        let params = skip_if_not_sponsorship!(decision);
        match ctx.protocol_budget_usd {
            Some(balance) if balance >= params.estimated_cost_usd => RuleOutcome::pass(),
            Some(balance) => RuleOutcome::fail(format!(
                "protocol budget ${balance:.2} is below the estimated cost ${:.2}",
                params.estimated_cost_usd
            )),
            None => RuleOutcome::fail("no protocol budget on record"),
        }
    }
}

pub struct ReserveBalanceRule;

#[async_trait]
impl PolicyRule for ReserveBalanceRule {
    fn name(&self) -> &'static str {
        "agent-reserve"
    }
    fn description(&self) -> &'static str {
        "The sponsor's own native reserve must exceed the configured floor before taking on new gas spend"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        skip_if_not_sponsorship!(decision);
        match ctx.reserve_balance_eth {
            Some(balance) if balance >= ctx.config.reserve_threshold_eth => RuleOutcome::pass(),
            Some(balance) => RuleOutcome::fail(format!(
                "reserve balance {balance:.4} ETH is below the threshold {:.4} ETH",
                ctx.config.reserve_threshold_eth
            )),
            None => RuleOutcome::fail("reserve balance unavailable"),
        }
    }
}

pub struct DailyCapPerUserRule;

#[async_trait]
impl PolicyRule for DailyCapPerUserRule {
    fn name(&self) -> &'static str {
        "daily-cap-per-user"
    }
    fn description(&self) -> &'static str {
        "Caps the number of sponsorships a single agent address may receive per rolling 24h"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        let params = skip_if_not_sponsorship!(decision);
        let key = keys::agent_daily_window(&params.agent_wallet_address);
        let window = Duration::from_secs(24 * 60 * 60);
        let quota = ctx.config.max_sponsorships_per_user_day as usize;
        let admitted = admit(ctx, &key, window, quota).await;

        if admitted {
            RuleOutcome::pass()
        } else {
            RuleOutcome::fail(format!(
                "agent exceeded the daily sponsorship cap of {}",
                ctx.config.max_sponsorships_per_user_day
            ))
        }
    }
}

pub struct GlobalRateLimitRule;

#[async_trait]
impl PolicyRule for GlobalRateLimitRule {
    fn name(&self) -> &'static str {
        "global-rate-limit"
    }
    fn description(&self) -> &'static str {
        "Caps total sponsorships per rolling minute across every agent and protocol"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        skip_if_not_sponsorship!(decision);
        let window = Duration::from_secs(60);
        let quota = ctx.config.max_sponsorships_per_minute as usize;
        let admitted = admit(ctx, keys::GLOBAL_MINUTE_WINDOW, window, quota).await;

        if admitted {
            RuleOutcome::pass()
        } else {
            RuleOutcome::fail(format!(
                "global sponsorship rate exceeded {} per minute",
                ctx.config.max_sponsorships_per_minute
            ))
        }
    }
}

pub struct PerProtocolRateLimitRule;

#[async_trait]
impl PolicyRule for PerProtocolRateLimitRule {
    fn name(&self) -> &'static str {
        "per-protocol-rate-limit"
    }
    fn description(&self) -> &'static str {
        "Caps sponsorships per rolling minute for a single protocol"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        let params = skip_if_not_sponsorship!(decision);
        let key = keys::protocol_minute_window(&params.protocol_id);
        let window = Duration::from_secs(60);
        let quota = ctx.config.max_sponsorships_per_protocol_minute as usize;
        let admitted = admit(ctx, &key, window, quota).await;

        if admitted {
            RuleOutcome::pass()
        } else {
            RuleOutcome::fail(format!(
                "protocol {} exceeded {} sponsorships per minute",
                params.protocol_id, ctx.config.max_sponsorships_per_protocol_minute
            ))
        }
    }
}

pub struct CostCapRule;

#[async_trait]
impl PolicyRule for CostCapRule {
    fn name(&self) -> &'static str {
        "cost-cap"
    }
    fn description(&self) -> &'static str {
        "Rejects any single sponsorship whose estimated cost exceeds the configured ceiling"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        let params = skip_if_not_sponsorship!(decision);
        if params.estimated_cost_usd > ctx.config.max_sponsorship_cost_usd {
            RuleOutcome::fail(format!(
                "estimated cost ${:.2} exceeds the per-sponsorship cap ${:.2}",
                params.estimated_cost_usd, ctx.config.max_sponsorship_cost_usd
            ))
        } else {
            RuleOutcome::pass()
        }
    }
}

pub struct WhitelistRule;

#[async_trait]
impl PolicyRule for WhitelistRule {
    fn name(&self) -> &'static str {
        "whitelist"
    }
    fn description(&self) -> &'static str {
        "When a protocol enforces a recipient whitelist, the target contract must appear in it"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        let params = skip_if_not_sponsorship!(decision);

        match &ctx.protocol_whitelist {
            Err(dependency) => RuleOutcome::fail(format!("whitelist lookup unavailable: {dependency}")),
            Ok(None) => RuleOutcome::pass(),
            Ok(Some(whitelist)) if whitelist.is_empty() => RuleOutcome::pass(),
            Ok(Some(whitelist)) => match &params.target_contract {
                Some(target) if whitelist.iter().any(|entry| entry.eq_ignore_ascii_case(target)) => RuleOutcome::pass(),
                Some(target) => RuleOutcome::fail(format!("target contract {target} is not on the protocol whitelist")),
                None => RuleOutcome::fail("protocol enforces a whitelist but no target contract was provided"),
            },
        }
    }
}

pub struct GasPriceOptimizationRule;

#[async_trait]
impl PolicyRule for GasPriceOptimizationRule {
    fn name(&self) -> &'static str {
        "gas-price-optimization"
    }
    fn description(&self) -> &'static str {
        "Defers sponsorship while the injected current gas price sits at or above the configured ceiling"
    }
    fn severity(&self) -> PolicySeverity {
        PolicySeverity::Error
    }

    async fn validate(&self, decision: &Decision, ctx: &PolicyContext<'_>) -> RuleOutcome {
        skip_if_not_sponsorship!(decision);
        match ctx.agent_config.current_gas_price_gwei {
            Some(gwei) if gwei >= ctx.config.gas_price_max_gwei => RuleOutcome::fail(format!(
                "current gas price {gwei:.2} gwei is at or above the ceiling {:.2} gwei",
                ctx.config.gas_price_max_gwei
            )),
            _ => RuleOutcome::pass(),
        }
    }
}

/// Registers the ten sponsorship rules in the declaration order spec
/// §4.4 lists them. Order matters for which single error a caller sees
/// first when multiple gates would have failed.
pub fn default_sponsorship_rules() -> Vec<Box<dyn PolicyRule>> {
    vec![
        Box::new(LegitimacyRule),
        Box::new(ApprovedAgentRule),
        Box::new(ProtocolBudgetRule),
        Box::new(ReserveBalanceRule),
        Box::new(DailyCapPerUserRule),
        Box::new(GlobalRateLimitRule),
        Box::new(PerProtocolRateLimitRule),
        Box::new(CostCapRule),
        Box::new(WhitelistRule),
        Box::new(GasPriceOptimizationRule),
    ]
}
