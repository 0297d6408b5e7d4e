// [libs/core/economic-breaker/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS ECONOMIC CIRCUIT BREAKER (V1.0)
 * CLASIFICACIÓN: CORE LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: PROTECCIÓN DE LA RESERVA NATIVA CONTRA CONDICIONES
 *                   ADVERSAS DE GAS, RUNWAY Y PRESUPUESTO
 *
 * A single global breaker per process, its state shared across
 * processes through the State Store under a fixed key. `run_check`
 * owns the load -> evaluate -> persist cycle; `check` (in `check.rs`)
 * is the pure state-transition function so the hysteresis and gate
 * logic can be tested without touching the store.
 * =================================================================
 */

mod check;
mod config;
mod history;
mod runway;

pub use check::{check, BreakerCheckContext, BreakerCheckReport};
pub use config::BreakerConfig;
pub use history::{load_gas_spend_history, record_gas_spend};
pub use runway::{estimate_runway, GasSpendSample, RunwayConfidence, RunwayEstimate};

use aegis_domain_models::keys;
use aegis_domain_models::BreakerState;
use aegis_state_store::{StateStore, StateStoreJsonExt};
use tracing::warn;

const BREAKER_STATE_TTL_SECONDS: u64 = 60 * 60;

/// Loads the persisted breaker state (defaulting to closed on absence
/// or on a transient store failure — a breaker read failure must never
/// be reported as open), runs one evaluation, and persists the result.
pub async fn run_check(
    store: &dyn StateStore,
    config: &BreakerConfig,
    ctx: &BreakerCheckContext,
) -> BreakerCheckReport {
    let mut state = match store.get_json::<BreakerState>(keys::BREAKER_STATE).await {
        Ok(existing) => existing.unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "⚠️  [BREAKER]: state load failed, assuming closed rather than reporting unhealthy");
            BreakerState::default()
        }
    };

    let report = check::check(config, &mut state, ctx);

    if let Err(err) = store
        .set_json(keys::BREAKER_STATE, &state, Some(BREAKER_STATE_TTL_SECONDS))
        .await
    {
        warn!(error = %err, "⚠️  [BREAKER]: state persist failed after check");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_state_store::InMemoryStateStore;

    #[tokio::test]
    async fn breaker_opens_and_state_is_persisted() {
        let store = InMemoryStateStore::new();
        let config = BreakerConfig::default();

        let ctx = BreakerCheckContext {
            reserves_eth: Some(0.01),
            ..Default::default()
        };

        let report = run_check(&store, &config, &ctx).await;
        assert!(report.is_open);

        let persisted: BreakerState = store
            .get_json(keys::BREAKER_STATE)
            .await
            .unwrap()
            .expect("breaker state must be persisted");
        assert!(persisted.is_open);
    }

    #[tokio::test]
    async fn disabled_config_is_respected_by_callers_not_by_check_itself() {
        // `check` has no opinion on `enabled` -- callers (policy engine,
        // the gas-sponsorship cycle) decide whether to consult the
        // breaker at all when ECONOMIC_BREAKER_ENABLED=false.
        let config = BreakerConfig { enabled: false, ..BreakerConfig::default() };
        assert!(!config.enabled);
    }
}
