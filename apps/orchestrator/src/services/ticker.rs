// [apps/orchestrator/src/services/ticker.rs]
/*!
 * =================================================================
 * APARATO: MODE TICKER (V1.0)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L1-APP)
 * RESPONSABILIDAD: BUCLE DE CICLO PERIÓDICO POR MODO
 *
 * observe -> reason -> inject gas price -> validate -> execute ->
 * record. Each tick runs to completion before the next fires, so a
 * slow cycle delays its own mode's next tick without affecting any
 * other mode or the queue consumer.
 * =================================================================
 */

use super::{build_policy_context, consult_breaker, record_successful_sponsorship};
use crate::external::ExecuteOutcome;
use crate::memory::{CycleOutcome, MemoryRecord};
use crate::modes::Mode;
use crate::state::AppState;
use aegis_domain_models::Decision;
use aegis_post_rate_limiter::{check_and_consume, PostCategory};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub fn spawn_mode_ticker(mode: Arc<dyn Mode>, state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        mode.on_start(&state).await;

        loop {
            if state.is_draining() {
                info!(mode = mode.id(), "🧹 [TICKER]: draining flag set, exiting before next cycle");
                break;
            }

            if let Err(panic_message) = run_cycle(mode.as_ref(), &state).await {
                error!(mode = mode.id(), error = %panic_message, "🔥 [TICKER]: cycle aborted");
            }

            if state.is_draining() {
                break;
            }
            tokio::time::sleep(interval).await;
        }
    })
}

async fn run_cycle(mode: &dyn Mode, state: &AppState) -> Result<(), String> {
    let baseline = mode.baseline_config();
    let reserve = aegis_reserve_state::load(
        state.store.as_ref(),
        state.config.reserve.target_reserve_eth,
        state.config.reserve.critical_threshold_eth,
    )
    .await;
    let adapted = mode.adapt_config(baseline, &reserve);

    let observations = mode.observe(state).await;
    if observations.is_empty() {
        return Ok(());
    }

    let memories = state.memory_store.recent(mode.id(), 20).await;
    let decision = mode.reason(state, &observations, &memories).await;

    let gwei = state.blockchain_observer.current_gas_price_gwei().await;
    let agent_config = match gwei {
        Some(price) => adapted.with_current_gas_price(price),
        None => adapted,
    };

    let Some(params) = decision.sponsor_params() else {
        record(state, mode.id(), &decision, CycleOutcome::Skipped, "non-sponsorship decision, nothing to execute").await;
        return Ok(());
    };

    let agent_tx_count = state.blockchain_observer.agent_transaction_count(&params.agent_wallet_address).await;
    let ctx = build_policy_context(state, &agent_config, &state.abuse_config, &reserve, &params.protocol_id, agent_tx_count);

    let report = aegis_policy_engine::evaluate(&state.policy_rules, &decision, &ctx).await;
    if !report.passed {
        record(
            state,
            mode.id(),
            &decision,
            CycleOutcome::PolicyRejected,
            &report.errors.join("; "),
        )
        .await;
        return Ok(());
    }

    if decision.confidence < agent_config.confidence_threshold {
        record(
            state,
            mode.id(),
            &decision,
            CycleOutcome::BelowConfidence,
            &format!(
                "confidence {:.2} below threshold {:.2}",
                decision.confidence, agent_config.confidence_threshold
            ),
        )
        .await;
        return Ok(());
    }

    let breaker_report = consult_breaker(state, &reserve, agent_config.current_gas_price_gwei).await;
    if breaker_report.is_open {
        let reason = breaker_report.open_reason.unwrap_or_else(|| "economic breaker open".to_string());
        warn!(mode = mode.id(), reason = %reason, "🔌 [TICKER]: breaker open, skipping execution");
        record(state, mode.id(), &decision, CycleOutcome::BreakerOpen, &reason).await;
        return Ok(());
    }

    let execution_mode = state.effective_execution_mode(agent_config.execution_mode);
    let outcome = state.execute_adapter.sponsor_transaction(params, execution_mode).await;

    if outcome.success {
        record_successful_sponsorship(
            state,
            &reserve,
            &params.agent_wallet_address,
            params.max_gas_units,
            agent_config.current_gas_price_gwei,
        )
        .await;
        publish_transparency_post(state, &outcome).await;
        record(state, mode.id(), &decision, CycleOutcome::Executed, "sponsor transaction executed").await;
    } else {
        let detail = outcome.error.unwrap_or_else(|| "sponsor execution failed".to_string());
        warn!(mode = mode.id(), error = %detail, "⚠️  [TICKER]: sponsor execution failed");
        record(state, mode.id(), &decision, CycleOutcome::Errored, &detail).await;
    }

    Ok(())
}

async fn publish_transparency_post(state: &AppState, outcome: &ExecuteOutcome) {
    let check = check_and_consume(state.store.as_ref(), &state.post_rate_limiter_config, PostCategory::Proof).await;
    if let Some(warning) = &check.warning {
        warn!(warning, "⚠️  [TICKER]: transparency post budget warning");
    }
    if !check.allowed {
        warn!("⚠️  [TICKER]: proof post budget exhausted, skipping transparency publish");
        return;
    }

    let message = match &outcome.tx_hash {
        Some(hash) => format!("sponsored a transaction: {hash}"),
        None => "sponsored a transaction".to_string(),
    };
    state.transparency_poster.publish(PostCategory::Proof.as_str(), &message).await;
}

async fn record(state: &AppState, mode_id: &'static str, decision: &Decision, outcome: CycleOutcome, detail: &str) {
    state
        .memory_store
        .record(MemoryRecord { mode_id, recorded_at: Utc::now(), decision: decision.clone(), outcome, detail: detail.to_string() })
        .await;
}
