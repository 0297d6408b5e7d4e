// [libs/domain/reserve-state/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS RESERVE STATE (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: REGISTRO COMPARTIDO DE RESERVA Y SUS CAMPOS DERIVADOS
 *
 * The single logical reserve record lives at one State Store key.
 * Every reader merges with defaults (forward compatibility for older
 * records); every writer recomputes runway, forecast, and health score
 * rather than trusting a caller-supplied value.
 * =================================================================
 */

mod health_score;
mod merge;

pub use health_score::compute_health_score;
pub use merge::{merge_and_derive, ReserveStateUpdate};

use aegis_domain_models::keys;
use aegis_domain_models::ReserveState;
use aegis_state_store::{StateStore, StateStoreJsonExt};
use tracing::warn;

/// Loads the reserve record, falling back to config-seeded defaults on
/// absence or on a transient store failure.
pub async fn load(store: &dyn StateStore, target_reserve_eth: f64, critical_threshold_eth: f64) -> ReserveState {
    match store.get_json::<ReserveState>(keys::RESERVE_STATE).await {
        Ok(Some(state)) => state,
        Ok(None) => ReserveState::defaults(target_reserve_eth, critical_threshold_eth),
        Err(err) => {
            warn!(error = %err, "⚠️  [RESERVE_STATE]: load failed, seeding defaults");
            ReserveState::defaults(target_reserve_eth, critical_threshold_eth)
        }
    }
}

/// Load -> merge -> derive -> persist, returning the updated record.
pub async fn update_reserve_state(
    store: &dyn StateStore,
    target_reserve_eth: f64,
    critical_threshold_eth: f64,
    update: ReserveStateUpdate,
) -> ReserveState {
    let mut state = load(store, target_reserve_eth, critical_threshold_eth).await;
    merge::merge_and_derive(&mut state, update);

    if let Err(err) = store.set_json(keys::RESERVE_STATE, &state, None).await {
        warn!(error = %err, "⚠️  [RESERVE_STATE]: persist failed after update");
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_state_store::InMemoryStateStore;

    #[tokio::test]
    async fn update_persists_and_round_trips() {
        let store = InMemoryStateStore::new();

        let state = update_reserve_state(
            &store,
            0.5,
            0.05,
            ReserveStateUpdate {
                native_balance_eth: Some(0.7),
                daily_burn_rate_eth: Some(0.05),
                ..Default::default()
            },
        )
        .await;

        assert!((state.runway_days - 14.0).abs() < 1e-9);

        let reloaded = load(&store, 0.5, 0.05).await;
        assert_eq!(reloaded.native_balance_eth, 0.7);
    }

    #[tokio::test]
    async fn absent_record_seeds_config_defaults() {
        let store = InMemoryStateStore::new();
        let state = load(&store, 0.5, 0.05).await;
        assert_eq!(state.target_reserve_eth, 0.5);
        assert_eq!(state.critical_threshold_eth, 0.05);
    }
}
