// [libs/domain/reserve-state/src/merge.rs]
use crate::health_score::compute_health_score;
use aegis_domain_models::reserve::{BurnSnapshot, ProtocolBudgetState};
use aegis_domain_models::ReserveState;
use chrono::{DateTime, Utc};

/// Sparse patch applied on top of the persisted record. Every field a
/// mode's observe/execute step might learn this cycle is optional;
/// anything left `None` keeps its current value.
#[derive(Debug, Clone, Default)]
pub struct ReserveStateUpdate {
    pub native_balance_eth: Option<f64>,
    pub stable_balance_usdc: Option<f64>,
    pub chain_id: Option<u64>,
    pub avg_burn_per_sponsorship_eth: Option<f64>,
    pub sponsorships_trailing_24h: Option<u32>,
    pub daily_burn_rate_eth: Option<f64>,
    pub protocol_budgets: Option<Vec<ProtocolBudgetState>>,
    pub emergency_mode: Option<bool>,
    pub forecasted_burn_rate_7d_eth: Option<f64>,
    pub last_external_post_at: Option<DateTime<Utc>>,
    pub push_burn_snapshot: Option<BurnSnapshot>,
}

/// Applies `update` in place, then recomputes every derived field
/// (`runwayDays`, `forecastedRunwayDays`, `healthScore`) and bumps
/// `lastUpdated`. Mirrors spec §4.7's `updateReserveState`.
pub fn merge_and_derive(state: &mut ReserveState, update: ReserveStateUpdate) {
    if let Some(v) = update.native_balance_eth {
        state.native_balance_eth = v;
    }
    if let Some(v) = update.stable_balance_usdc {
        state.stable_balance_usdc = v;
    }
    if let Some(v) = update.chain_id {
        state.chain_id = v;
    }
    if let Some(v) = update.avg_burn_per_sponsorship_eth {
        state.avg_burn_per_sponsorship_eth = v;
    }
    if let Some(v) = update.sponsorships_trailing_24h {
        state.sponsorships_trailing_24h = v;
    }
    if let Some(v) = update.daily_burn_rate_eth {
        state.daily_burn_rate_eth = v;
    }
    if let Some(v) = update.protocol_budgets {
        state.protocol_budgets = v;
    }
    if let Some(v) = update.emergency_mode {
        state.emergency_mode = v;
    }
    if let Some(v) = update.forecasted_burn_rate_7d_eth {
        state.forecasted_burn_rate_7d_eth = v;
    }
    if let Some(v) = update.last_external_post_at {
        state.last_external_post_at = Some(v);
    }
    if let Some(snapshot) = update.push_burn_snapshot {
        state.push_burn_snapshot(snapshot);
    }

    state.runway_days = if state.daily_burn_rate_eth > 0.0 {
        state.native_balance_eth / state.daily_burn_rate_eth
    } else {
        f64::INFINITY
    };

    state.forecasted_runway_7d_days = if state.forecasted_burn_rate_7d_eth > 0.0 {
        state.native_balance_eth / state.forecasted_burn_rate_7d_eth
    } else {
        f64::INFINITY
    };

    state.health_score = compute_health_score(state);
    state.last_updated = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_runway_from_new_burn_rate() {
        let mut state = ReserveState::defaults(0.5, 0.05);
        merge_and_derive(
            &mut state,
            ReserveStateUpdate {
                native_balance_eth: Some(1.0),
                daily_burn_rate_eth: Some(0.1),
                ..Default::default()
            },
        );
        assert!((state.runway_days - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_burn_rate_keeps_runway_infinite() {
        let mut state = ReserveState::defaults(0.5, 0.05);
        merge_and_derive(
            &mut state,
            ReserveStateUpdate {
                native_balance_eth: Some(2.0),
                ..Default::default()
            },
        );
        assert_eq!(state.runway_days, f64::INFINITY);
    }
}
