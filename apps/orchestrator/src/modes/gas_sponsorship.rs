// [apps/orchestrator/src/modes/gas_sponsorship.rs]
/*!
 * =================================================================
 * APARATO: GAS SPONSORSHIP MODE (V1.0)
 * CLASIFICACIÓN: CORE LOGIC (ESTRATO L1-APP)
 * RESPONSABILIDAD: DECISIÓN DE PATROCINIO POR CICLO
 *
 * The only mode whose observe() can fan out into an actual
 * SPONSOR_TRANSACTION proposal, and whose config adapts at runtime:
 * a reserve under 50% health (outside emergency) tightens the
 * confidence bar from 0.80 to 0.90 before reasoning even runs.
 * =================================================================
 */

use super::Mode;
use crate::state::AppState;
use aegis_domain_models::{AgentConfig, ExecutionMode, Observation, ReserveState, TriggerSource};
use async_trait::async_trait;
use std::collections::HashSet;

const HEALTH_SCORE_ADAPTIVE_CONFIDENCE: f64 = 0.90;
const HEALTH_SCORE_ADAPTIVE_THRESHOLD: f64 = 50.0;

pub struct GasSponsorshipMode;

#[async_trait]
impl Mode for GasSponsorshipMode {
    fn id(&self) -> &'static str {
        "gas-sponsorship"
    }

    fn name(&self) -> &'static str {
        "Gas Sponsorship"
    }

    fn baseline_config(&self) -> AgentConfig {
        AgentConfig {
            confidence_threshold: 0.80,
            execution_mode: ExecutionMode::Live,
            max_gas_price_gwei: 2.0,
            current_gas_price_gwei: None,
            allowed_recipients: HashSet::new(),
            max_slippage_bps: 50,
            rate_limit_window_secs: 60,
            rate_limit_quota: 10,
            trigger_source: TriggerSource::Scheduled,
        }
    }

    async fn observe(&self, state: &AppState) -> Vec<Observation> {
        let reserve = aegis_reserve_state::load(
            state.store.as_ref(),
            state.config.reserve.target_reserve_eth,
            state.config.reserve.critical_threshold_eth,
        )
        .await;

        if reserve.emergency_mode {
            return Vec::new();
        }
        if reserve.health_score < state.config.reserve.sponsorship_health_skip_threshold {
            return Vec::new();
        }

        state.blockchain_observer.sponsorship_opportunities().await
    }

    fn adapt_config(&self, baseline: AgentConfig, reserve: &ReserveState) -> AgentConfig {
        if reserve.health_score < HEALTH_SCORE_ADAPTIVE_THRESHOLD && !reserve.emergency_mode {
            AgentConfig { confidence_threshold: HEALTH_SCORE_ADAPTIVE_CONFIDENCE, ..baseline }
        } else {
            baseline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AegisConfig, ChannelConfig, ExecutionConfig, ObservationConfig, ReserveConfig};
    use aegis_economic_breaker::BreakerConfig;
    use aegis_policy_engine::PolicyConfig;
    use aegis_reserve_state::ReserveStateUpdate;
    use aegis_state_store::InMemoryStateStore;
    use std::sync::Arc;

    fn test_config() -> AegisConfig {
        AegisConfig {
            execution: ExecutionConfig {
                network: crate::config::AgentNetwork::Base,
                wallet_private_key: None,
                agent_wallet_address: None,
                usdc_address: None,
                base_rpc_url: None,
            },
            policy: PolicyConfig::default(),
            breaker: BreakerConfig::default(),
            reserve: ReserveConfig::default(),
            channels: ChannelConfig { redis_url: None, request_signature_secret: None, protocol_webhook_secret: None },
            observations: ObservationConfig {
                blockscout_api_url: None,
                whitelisted_low_gas_candidates: Vec::new(),
                whitelisted_new_wallet_candidates: Vec::new(),
                abuse_scam_contracts: Vec::new(),
            },
            port: 3000,
        }
    }

    #[tokio::test]
    async fn emergency_mode_skips_observation_entirely() {
        // resolve_state_store caches a process-wide singleton; give this
        // test its own store so it can't see another test's reserve state.
        let mut state = AppState::bootstrap(test_config()).await;
        let store = Arc::new(InMemoryStateStore::new());
        state.store = store.clone();

        aegis_reserve_state::update_reserve_state(
            store.as_ref(),
            state.config.reserve.target_reserve_eth,
            state.config.reserve.critical_threshold_eth,
            ReserveStateUpdate { emergency_mode: Some(true), ..Default::default() },
        )
        .await;

        let observations = GasSponsorshipMode.observe(&state).await;
        assert!(observations.is_empty());
    }

    #[tokio::test]
    async fn low_health_score_skips_observation_without_emergency_mode() {
        let mut state = AppState::bootstrap(test_config()).await;
        let store = Arc::new(InMemoryStateStore::new());
        state.store = store.clone();

        aegis_reserve_state::update_reserve_state(
            store.as_ref(),
            state.config.reserve.target_reserve_eth,
            state.config.reserve.critical_threshold_eth,
            ReserveStateUpdate {
                native_balance_eth: Some(0.001),
                stable_balance_usdc: Some(0.0),
                daily_burn_rate_eth: Some(1.0),
                ..Default::default()
            },
        )
        .await;

        let observations = GasSponsorshipMode.observe(&state).await;
        assert!(observations.is_empty());
    }
}
