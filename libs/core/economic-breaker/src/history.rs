// [libs/core/economic-breaker/src/history.rs]
/*!
 * =================================================================
 * APARATO: GAS SPEND HISTORY (V1.0)
 * CLASIFICACIÓN: CORE LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: BITÁCORA ACOTADA DE GASTO DE GAS PARA EL ESTIMADOR DE RUNWAY
 *
 * `estimate_runway` is a pure function over a sample slice; this is
 * where that slice actually comes from in production — a capped,
 * State-Store-backed ring the consultation site appends to after every
 * successful sponsorship.
 * =================================================================
 */

use crate::runway::GasSpendSample;
use aegis_domain_models::keys;
use aegis_state_store::{StateStore, StateStoreJsonExt};
use tracing::warn;

const GAS_SPEND_HISTORY_CAP: usize = 500;
const GAS_SPEND_HISTORY_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Loads the persisted gas-spend ring, defaulting to empty on absence
/// or on a transient store failure — a history read failure degrades
/// the runway estimate, it must not block the cycle.
pub async fn load_gas_spend_history(store: &dyn StateStore) -> Vec<GasSpendSample> {
    match store.get_json::<Vec<GasSpendSample>>(keys::GAS_SPEND_HISTORY).await {
        Ok(Some(samples)) => samples,
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!(error = %err, "⚠️  [BREAKER]: gas spend history load failed, treating as empty");
            Vec::new()
        }
    }
}

/// Appends one sample and persists the capped history. Called once per
/// successful sponsorship execution.
pub async fn record_gas_spend(store: &dyn StateStore, sample: GasSpendSample) {
    let mut history = load_gas_spend_history(store).await;
    history.push(sample);

    if history.len() > GAS_SPEND_HISTORY_CAP {
        let overflow = history.len() - GAS_SPEND_HISTORY_CAP;
        history.drain(0..overflow);
    }

    if let Err(err) = store
        .set_json(keys::GAS_SPEND_HISTORY, &history, Some(GAS_SPEND_HISTORY_TTL_SECONDS))
        .await
    {
        warn!(error = %err, "⚠️  [BREAKER]: gas spend history persist failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runway::estimate_runway;
    use aegis_state_store::InMemoryStateStore;
    use chrono::Utc;

    #[tokio::test]
    async fn recorded_samples_round_trip_and_feed_the_runway_estimate() {
        let store = InMemoryStateStore::new();
        assert!(load_gas_spend_history(&store).await.is_empty());

        record_gas_spend(&store, GasSpendSample { timestamp: Utc::now(), gas_units: 21_000, gas_price_gwei: 1.0 }).await;
        record_gas_spend(&store, GasSpendSample { timestamp: Utc::now(), gas_units: 21_000, gas_price_gwei: 1.0 }).await;

        let history = load_gas_spend_history(&store).await;
        assert_eq!(history.len(), 2);

        let estimate = estimate_runway(1.0, &history);
        assert_eq!(estimate.samples_considered, 2);
        assert!(estimate.hourly_burn_eth > 0.0);
    }

    #[tokio::test]
    async fn history_is_capped_at_its_configured_size() {
        let store = InMemoryStateStore::new();
        for _ in 0..(GAS_SPEND_HISTORY_CAP + 10) {
            record_gas_spend(&store, GasSpendSample { timestamp: Utc::now(), gas_units: 21_000, gas_price_gwei: 1.0 }).await;
        }

        let history = load_gas_spend_history(&store).await;
        assert_eq!(history.len(), GAS_SPEND_HISTORY_CAP);
    }
}
