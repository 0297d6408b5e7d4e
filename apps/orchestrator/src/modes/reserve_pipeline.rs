// [apps/orchestrator/src/modes/reserve_pipeline.rs]
/*!
 * =================================================================
 * APARATO: RESERVE PIPELINE MODE (V1.0)
 * CLASIFICACIÓN: CORE LOGIC (ESTRATO L1-APP)
 * RESPONSABILIDAD: MANTENIMIENTO DEL REGISTRO DE RESERVA COMPARTIDO
 *
 * Refreshes wallet balances into the Reserve State on startup, then
 * each cycle turns the current record into the handful of
 * observations (burn rate, runway, forecast, pending budget) the
 * reasoning step needs to decide whether a SWAP_RESERVES or
 * ALERT_PROTOCOL action is warranted.
 * =================================================================
 */

use super::Mode;
use crate::state::AppState;
use aegis_domain_models::{AgentConfig, ExecutionMode, Observation, ObservationSource, TriggerSource};
use aegis_reserve_state::ReserveStateUpdate;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use tracing::{info, warn};

pub struct ReservePipelineMode;

#[async_trait]
impl Mode for ReservePipelineMode {
    fn id(&self) -> &'static str {
        "reserve-pipeline"
    }

    fn name(&self) -> &'static str {
        "Reserve Pipeline"
    }

    fn baseline_config(&self) -> AgentConfig {
        AgentConfig {
            confidence_threshold: 0.85,
            execution_mode: ExecutionMode::Live,
            max_gas_price_gwei: 5.0,
            current_gas_price_gwei: None,
            allowed_recipients: HashSet::new(),
            max_slippage_bps: 50,
            rate_limit_window_secs: 60,
            rate_limit_quota: 10,
            trigger_source: TriggerSource::Scheduled,
        }
    }

    async fn on_start(&self, state: &AppState) {
        let Some((native_eth, usdc)) = state.blockchain_observer.wallet_balances().await else {
            warn!("⚠️  [RESERVE_PIPELINE]: wallet balance observer unavailable, skipping seed");
            return;
        };

        aegis_reserve_state::update_reserve_state(
            state.store.as_ref(),
            state.config.reserve.target_reserve_eth,
            state.config.reserve.critical_threshold_eth,
            ReserveStateUpdate {
                native_balance_eth: Some(native_eth),
                stable_balance_usdc: Some(usdc),
                ..Default::default()
            },
        )
        .await;

        info!(native_eth, usdc, "🔌 [RESERVE_PIPELINE]: seeded wallet balances into reserve state");
    }

    async fn observe(&self, state: &AppState) -> Vec<Observation> {
        let reserve = aegis_reserve_state::load(
            state.store.as_ref(),
            state.config.reserve.target_reserve_eth,
            state.config.reserve.critical_threshold_eth,
        )
        .await;

        vec![
            Observation::new(
                "reserve-burn-rate",
                ObservationSource::Api,
                Some(reserve.chain_id),
                json!({
                    "dailyBurnRateEth": reserve.daily_burn_rate_eth,
                    "avgBurnPerSponsorshipEth": reserve.avg_burn_per_sponsorship_eth,
                    "sponsorshipsTrailing24h": reserve.sponsorships_trailing_24h,
                }),
                "trailing burn rate and sponsorship volume",
            ),
            Observation::new(
                "reserve-runway",
                ObservationSource::Api,
                Some(reserve.chain_id),
                json!({
                    "runwayDays": reserve.runway_days,
                    "forecastedRunway7dDays": reserve.forecasted_runway_7d_days,
                    "healthScore": reserve.health_score,
                }),
                "current and forecasted runway",
            ),
            Observation::new(
                "reserve-pending-budgets",
                ObservationSource::Api,
                Some(reserve.chain_id),
                json!({ "protocolBudgets": reserve.protocol_budgets }),
                "outstanding protocol prepaid budgets",
            ),
        ]
    }
}
