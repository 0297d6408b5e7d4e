// [apps/orchestrator/src/services/mod.rs]
/*!
 * =================================================================
 * APARATO: SERVICE ORCHESTRATION HUB (V1.0)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L1-APP)
 * RESPONSABILIDAD: TICKERS, CONSUMIDOR DE COLA Y PROGRAMADOR DE SKILLS
 * =================================================================
 */

pub mod consumer;
pub mod scheduler;
pub mod ticker;

pub use consumer::spawn_queue_consumer;
pub use scheduler::SkillScheduler;
pub use ticker::spawn_mode_ticker;

use crate::state::AppState;
use aegis_abuse_detection::AbuseDetectionConfig;
use aegis_domain_models::{AgentConfig, ReserveState};
use aegis_economic_breaker::{BreakerCheckContext, BreakerCheckReport};
use aegis_policy_engine::{AgentApproval, FailClosedLookup, PolicyContext};

/// Assembles the `PolicyContext` both the mode ticker and the queue
/// consumer need. Every field either comes from the Reserve State (in
/// scope) or defaults to the permissive/fail-closed answer appropriate
/// for a dependency this crate deliberately excludes (approval ledger,
/// gas passport reputation, protocol whitelist registry).
pub(crate) fn build_policy_context<'a>(
    state: &'a AppState,
    agent_config: &'a AgentConfig,
    abuse_config: &'a AbuseDetectionConfig,
    reserve: &ReserveState,
    protocol_id: &str,
    agent_tx_count: Option<u64>,
) -> PolicyContext<'a> {
    let protocol_budget_usd = reserve
        .protocol_budgets
        .iter()
        .find(|budget| budget.protocol_id == protocol_id)
        .map(|budget| budget.balance_usd);

    let agent_approval: FailClosedLookup<Option<AgentApproval>> = if state.config.policy.require_agent_approval {
        Err("agent approval ledger not configured".to_string())
    } else {
        Ok(None)
    };

    PolicyContext {
        store: state.store.as_ref(),
        config: &state.config.policy,
        agent_config,
        abuse_config,
        history_provider: state.transaction_history.as_ref(),
        agent_tx_count,
        gas_passport: None,
        agent_approval,
        protocol_budget_usd,
        reserve_balance_eth: Some(reserve.native_balance_eth),
        protocol_whitelist: Ok(None),
        record: false,
    }
}

/// Consults the economic circuit breaker before any sponsorship
/// execution, feeding it the live gas price, current reserve balances,
/// and a runway estimate derived from the persisted gas-spend history.
/// Respects `ECONOMIC_BREAKER_ENABLED`: when disabled, the breaker is
/// not consulted at all and reports closed.
pub(crate) async fn consult_breaker(
    state: &AppState,
    reserve: &ReserveState,
    current_gas_price_gwei: Option<f64>,
) -> BreakerCheckReport {
    if !state.config.breaker.enabled {
        return BreakerCheckReport::default();
    }

    let history = aegis_economic_breaker::load_gas_spend_history(state.store.as_ref()).await;
    let runway = aegis_economic_breaker::estimate_runway(reserve.native_balance_eth, &history);

    let ctx = BreakerCheckContext {
        current_gas_price_gwei,
        reserves_eth: Some(reserve.native_balance_eth),
        reserves_usdc: Some(reserve.stable_balance_usdc),
        estimated_runway_hours: Some(runway.runway_hours),
        protocol_budgets: reserve.protocol_budgets.clone(),
    };

    aegis_economic_breaker::run_check(state.store.as_ref(), &state.config.breaker, &ctx).await
}

/// Records the shared side effects of a successful sponsorship: burns
/// the estimated cost off the Reserve State, feeds this cycle's gas
/// spend into the breaker's runway history, and marks the agent against
/// the abuse-detection sybil window.
pub(crate) async fn record_successful_sponsorship(
    state: &AppState,
    reserve: &ReserveState,
    agent_wallet_address: &str,
    gas_units: u64,
    gas_price_gwei: Option<f64>,
) {
    let gwei = gas_price_gwei.unwrap_or(0.0);
    let burn_eth = (gas_units as f64) * gwei / 1_000_000_000.0;
    let new_balance = (reserve.native_balance_eth - burn_eth).max(0.0);
    let now = chrono::Utc::now();

    aegis_reserve_state::update_reserve_state(
        state.store.as_ref(),
        state.config.reserve.target_reserve_eth,
        state.config.reserve.critical_threshold_eth,
        aegis_reserve_state::ReserveStateUpdate {
            native_balance_eth: Some(new_balance),
            sponsorships_trailing_24h: Some(reserve.sponsorships_trailing_24h.saturating_add(1)),
            push_burn_snapshot: Some(aegis_domain_models::reserve::BurnSnapshot { timestamp: now, burn_rate_eth: burn_eth }),
            ..Default::default()
        },
    )
    .await;

    aegis_economic_breaker::record_gas_spend(
        state.store.as_ref(),
        aegis_economic_breaker::GasSpendSample { timestamp: now, gas_units, gas_price_gwei: gwei },
    )
    .await;

    aegis_abuse_detection::record_sponsorship(state.store.as_ref(), &state.abuse_config, agent_wallet_address).await;
}
