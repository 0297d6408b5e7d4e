// [libs/core/policy-engine/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS POLICY ENGINE (V1.0)
 * CLASIFICACIÓN: CORE LOGIC (ESTRATO L1)
 * RESPONSABILIDAD: ARBITRAJE DE CADA DECISIÓN DE PATROCINIO
 *
 * An ordered, fail-closed-where-it-matters rule chain gates every
 * `SPONSOR_TRANSACTION` decision before it reaches the sponsorship
 * queue. Non-sponsorship decisions pass through untouched. Counter
 * consumption (the daily/global/protocol sliding windows) is deferred
 * until the whole chain has already cleared, so a rejected decision
 * never spends quota it never used.
 * =================================================================
 */

pub mod config;
pub mod context;
pub mod report;
pub mod rule;
pub mod rules;

pub use config::PolicyConfig;
pub use context::{AgentApproval, FailClosedLookup, GasPassportSnapshot, PolicyContext};
pub use report::{evaluate, PolicyReport};
pub use rule::{PolicyRule, PolicySeverity, RuleOutcome};
pub use rules::default_sponsorship_rules as build_default_rules;

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_abuse_detection::{AbuseDetectionConfig, NoopTransactionHistoryProvider};
    use aegis_domain_models::{
        keys, AgentConfig, Decision, ExecutionMode, SponsorTransactionParams, TriggerSource,
    };
    use aegis_state_store::InMemoryStateStore;
    use std::collections::HashSet;

    fn agent_config(gas_price_gwei: Option<f64>) -> AgentConfig {
        AgentConfig {
            confidence_threshold: 0.8,
            execution_mode: ExecutionMode::Live,
            max_gas_price_gwei: 5.0,
            current_gas_price_gwei: gas_price_gwei,
            allowed_recipients: HashSet::new(),
            max_slippage_bps: 50,
            rate_limit_window_secs: 60,
            rate_limit_quota: 10,
            trigger_source: TriggerSource::Scheduled,
        }
    }

    fn sponsor_decision(agent: &str, protocol: &str, cost_usd: f64) -> Decision {
        Decision::sponsor_transaction(
            SponsorTransactionParams {
                agent_wallet_address: agent.to_string(),
                protocol_id: protocol.to_string(),
                estimated_cost_usd: cost_usd,
                max_gas_units: 200_000,
                target_contract: None,
            },
            0.9,
            "within thresholds",
        )
    }

    fn clear_context<'a>(
        store: &'a InMemoryStateStore,
        config: &'a PolicyConfig,
        abuse_config: &'a AbuseDetectionConfig,
        agent_config: &'a AgentConfig,
        history: &'a NoopTransactionHistoryProvider,
    ) -> PolicyContext<'a> {
        PolicyContext {
            store,
            config,
            agent_config,
            abuse_config,
            history_provider: history,
            agent_tx_count: Some(50),
            gas_passport: None,
            agent_approval: Ok(None),
            protocol_budget_usd: Some(100.0),
            reserve_balance_eth: Some(5.0),
            protocol_whitelist: Ok(None),
            record: true,
        }
    }

    #[tokio::test]
    async fn happy_sponsorship_cycle_clears_every_rule() {
        let store = InMemoryStateStore::new();
        let config = PolicyConfig::default();
        let abuse_config = AbuseDetectionConfig::default();
        let agent = agent_config(Some(1.0));
        let history = NoopTransactionHistoryProvider;
        let ctx = clear_context(&store, &config, &abuse_config, &agent, &history);

        let decision = sponsor_decision("0xagent", "protocol-a", 0.1);
        let rules = build_default_rules();
        let report = evaluate(&rules, &decision, &ctx).await;

        assert!(report.passed, "expected a clean pass, got errors: {:?}", report.errors);
        assert_eq!(report.applied_rules.len(), rules.len());
    }

    #[tokio::test]
    async fn gas_price_at_or_above_ceiling_fails_under_the_scenario_rule_name() {
        let store = InMemoryStateStore::new();
        let config = PolicyConfig::default();
        let abuse_config = AbuseDetectionConfig::default();
        let agent = agent_config(Some(config.gas_price_max_gwei));
        let history = NoopTransactionHistoryProvider;
        let ctx = clear_context(&store, &config, &abuse_config, &agent, &history);

        let decision = sponsor_decision("0xagent", "protocol-a", 0.1);
        let rules = build_default_rules();
        let report = evaluate(&rules, &decision, &ctx).await;

        assert!(!report.passed);
        assert!(
            report.errors.iter().any(|e| e.starts_with("[gas-price-optimization]")),
            "expected a gas-price-optimization error, got {:?}",
            report.errors
        );
    }

    #[tokio::test]
    async fn a_rejected_decision_never_consumes_sliding_window_quota() {
        let store = InMemoryStateStore::new();
        let config = PolicyConfig::default();
        let abuse_config = AbuseDetectionConfig::default();
        // Cost above the per-sponsorship cap guarantees a rejection that
        // arrives after the rate-limit rules have already run their probe.
        let agent = agent_config(Some(1.0));
        let history = NoopTransactionHistoryProvider;
        let ctx = clear_context(&store, &config, &abuse_config, &agent, &history);

        let decision = sponsor_decision("0xagent", "protocol-a", config.max_sponsorship_cost_usd + 1.0);
        let rules = build_default_rules();
        let report = evaluate(&rules, &decision, &ctx).await;

        assert!(!report.passed);
        assert_eq!(
            aegis_rate_limit::SlidingWindowCounter::count_in_window(
                &store,
                keys::GLOBAL_MINUTE_WINDOW,
                std::time::Duration::from_secs(60),
            )
            .await
            .unwrap(),
            0
        );
        assert_eq!(
            aegis_rate_limit::SlidingWindowCounter::count_in_window(
                &store,
                &keys::agent_daily_window("0xagent"),
                std::time::Duration::from_secs(24 * 60 * 60),
            )
            .await
            .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn an_admitted_decision_consumes_exactly_once() {
        let store = InMemoryStateStore::new();
        let config = PolicyConfig::default();
        let abuse_config = AbuseDetectionConfig::default();
        let agent = agent_config(Some(1.0));
        let history = NoopTransactionHistoryProvider;
        let ctx = clear_context(&store, &config, &abuse_config, &agent, &history);

        let decision = sponsor_decision("0xagent", "protocol-a", 0.1);
        let rules = build_default_rules();
        let report = evaluate(&rules, &decision, &ctx).await;
        assert!(report.passed);

        assert_eq!(
            aegis_rate_limit::SlidingWindowCounter::count_in_window(
                &store,
                keys::GLOBAL_MINUTE_WINDOW,
                std::time::Duration::from_secs(60),
            )
            .await
            .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn non_sponsorship_decisions_pass_every_rule_with_no_side_effects() {
        let store = InMemoryStateStore::new();
        let config = PolicyConfig::default();
        let abuse_config = AbuseDetectionConfig::default();
        let agent = agent_config(None);
        let history = NoopTransactionHistoryProvider;
        let ctx = clear_context(&store, &config, &abuse_config, &agent, &history);

        let decision = Decision::wait("nothing actionable this cycle");
        let rules = build_default_rules();
        let report = evaluate(&rules, &decision, &ctx).await;

        assert!(report.passed);
        assert!(report.errors.is_empty());
    }
}
