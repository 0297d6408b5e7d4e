// [apps/orchestrator/src/services/consumer.rs]
/*!
 * =================================================================
 * APARATO: SPONSORSHIP QUEUE CONSUMER (V1.0)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L1-APP)
 * RESPONSABILIDAD: DRENAJE PERIÓDICO DE LA COLA DE PATROCINIO
 *
 * Drains up to MAX_ITEMS_PER_RUN per tick, then recovers anything
 * stuck in `processing` past the stale window. Every dequeued request
 * is re-validated against the same policy rule chain a mode cycle
 * would use, built from the gas-sponsorship mode's adaptive config.
 * =================================================================
 */

use super::{build_policy_context, consult_breaker, record_successful_sponsorship};
use crate::modes::GasSponsorshipMode;
use crate::modes::Mode;
use crate::state::AppState;
use aegis_domain_models::{Decision, SponsorTransactionParams};
use aegis_sponsorship_queue::{complete, dequeue, fail, recover_stale_requests, reject};
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const MAX_ITEMS_PER_RUN: usize = 5;

pub fn spawn_queue_consumer(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if state.is_draining() {
                info!("🧹 [QUEUE_CONSUMER]: draining flag set, exiting before next tick");
                break;
            }

            run_tick(&state).await;

            if state.is_draining() {
                break;
            }
            tokio::time::sleep(interval).await;
        }
    })
}

async fn run_tick(state: &AppState) {
    for _ in 0..MAX_ITEMS_PER_RUN {
        let dequeued = match dequeue(state.store.as_ref()).await {
            Ok(Some(request)) => request,
            Ok(None) => break,
            Err(err) => {
                error!(error = %err, "🔥 [QUEUE_CONSUMER]: dequeue failed");
                break;
            }
        };

        process_request(state, dequeued).await;
    }

    match recover_stale_requests(state.store.as_ref()).await {
        Ok(0) => {}
        Ok(recovered) => info!(recovered, "🧹 [QUEUE_CONSUMER]: recovered stale requests"),
        Err(err) => error!(error = %err, "🔥 [QUEUE_CONSUMER]: stale recovery failed"),
    }
}

async fn process_request(state: &AppState, request: aegis_domain_models::SponsorshipRequest) {
    if let (Some(signature), Some(signature_timestamp)) =
        (&request.metadata.signature, request.metadata.signature_timestamp)
    {
        let Some(secret) = &state.config.channels.request_signature_secret else {
            let _ = reject(state.store.as_ref(), &request.id, "no request-signature secret configured").await;
            return;
        };

        let now_ms = Utc::now().timestamp_millis();
        let valid = crate::external::verify_request_signature(
            secret,
            &request.agent_address,
            &request.protocol_id,
            signature_timestamp,
            signature,
            now_ms,
        );

        if !valid {
            warn!(request_id = %request.id, "⚠️  [QUEUE_CONSUMER]: signature verification failed");
            let _ = reject(state.store.as_ref(), &request.id, "signature verification failed").await;
            return;
        }
    }

    let decision = Decision::sponsor_transaction(
        SponsorTransactionParams {
            agent_wallet_address: request.agent_address.clone(),
            protocol_id: request.protocol_id.clone(),
            estimated_cost_usd: request.estimated_cost_usd,
            max_gas_units: request.estimated_gas_units,
            target_contract: request.target_contract.clone(),
        },
        1.0,
        format!("Queue sponsorship: {}", request.id),
    );

    let gas_mode = GasSponsorshipMode;
    let reserve = aegis_reserve_state::load(
        state.store.as_ref(),
        state.config.reserve.target_reserve_eth,
        state.config.reserve.critical_threshold_eth,
    )
    .await;
    let adapted = gas_mode.adapt_config(gas_mode.baseline_config(), &reserve);
    let gwei = state.blockchain_observer.current_gas_price_gwei().await;
    let agent_config = match gwei {
        Some(price) => adapted.with_current_gas_price(price),
        None => adapted,
    };

    let agent_tx_count = state.blockchain_observer.agent_transaction_count(&request.agent_address).await;
    let ctx = build_policy_context(
        state,
        &agent_config,
        &state.abuse_config,
        &reserve,
        &request.protocol_id,
        agent_tx_count,
    );

    let report = aegis_policy_engine::evaluate(&state.policy_rules, &decision, &ctx).await;
    if !report.passed {
        let _ = reject(state.store.as_ref(), &request.id, &report.errors.join("; ")).await;
        return;
    }

    let breaker_report = consult_breaker(state, &reserve, agent_config.current_gas_price_gwei).await;
    if breaker_report.is_open {
        let reason = breaker_report.open_reason.unwrap_or_else(|| "economic breaker open".to_string());
        warn!(request_id = %request.id, reason = %reason, "🔌 [QUEUE_CONSUMER]: breaker open, rejecting request");
        let _ = reject(state.store.as_ref(), &request.id, &reason).await;
        return;
    }

    let params = decision.sponsor_params().expect("decision was built as sponsor_transaction");
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
        let _ = complete(state.store.as_ref(), &request.id, outcome.tx_hash, outcome.user_op_hash, outcome.actual_cost_usd).await;
    } else {
        let error_message = outcome.error.unwrap_or_else(|| "sponsor execution failed".to_string());
        let _ = fail(state.store.as_ref(), &request.id, &error_message, true).await;
    }
}
