// [libs/domain/reserve-state/src/health_score.rs]
use aegis_domain_models::ReserveState;

/// Chain ids treated as testnets for the adaptive-target halving. Base
/// Sepolia is the one this control plane actually deploys against;
/// the others are kept for parity with other EVM testnets a protocol
/// might configure.
const TESTNET_CHAIN_IDS: &[u64] = &[84532, 11155111, 5, 80001];

fn is_testnet_chain(chain_id: u64) -> bool {
    TESTNET_CHAIN_IDS.contains(&chain_id)
}

fn adaptive_target_eth(target_reserve_eth: f64, chain_id: u64) -> f64 {
    if is_testnet_chain(chain_id) {
        target_reserve_eth / 2.0
    } else {
        target_reserve_eth
    }
}

fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if (x1 - x0).abs() < f64::EPSILON {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

fn runway_score(runway_days: f64) -> f64 {
    if runway_days.is_infinite() || runway_days >= 30.0 {
        40.0
    } else if runway_days >= 7.0 {
        lerp(runway_days, 7.0, 30.0, 25.0, 40.0)
    } else if runway_days >= 1.0 {
        lerp(runway_days, 1.0, 7.0, 10.0, 25.0)
    } else if runway_days >= 0.0 {
        lerp(runway_days, 0.0, 1.0, 0.0, 10.0)
    } else {
        0.0
    }
}

fn activity_score(sponsorships_trailing_24h: u32, native_balance_eth: f64) -> f64 {
    let count = sponsorships_trailing_24h as f64;
    if count >= 50.0 {
        20.0
    } else if count >= 10.0 {
        lerp(count, 10.0, 50.0, 12.0, 20.0)
    } else if count >= 1.0 {
        lerp(count, 1.0, 10.0, 5.0, 12.0)
    } else if native_balance_eth > 0.0 {
        3.0
    } else {
        0.0
    }
}

/// The composite 40/40/20 score: balance-vs-adaptive-target, piecewise
/// runway, piecewise 24h activity. Clamped to `[0, 100]`.
pub fn compute_health_score(state: &ReserveState) -> f64 {
    let adaptive_target = adaptive_target_eth(state.target_reserve_eth, state.chain_id);
    let balance_ratio = if adaptive_target > 0.0 {
        (state.native_balance_eth / adaptive_target).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let score = balance_ratio * 40.0
        + runway_score(state.runway_days)
        + activity_score(state.sponsorships_trailing_24h, state.native_balance_eth);

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_state() -> ReserveState {
        ReserveState::defaults(0.5, 0.05)
    }

    #[test]
    fn full_marks_when_balance_runway_and_activity_are_all_healthy() {
        let mut state = base_state();
        state.native_balance_eth = 1.0;
        state.chain_id = 8453;
        state.runway_days = 60.0;
        state.sponsorships_trailing_24h = 80;

        assert_eq!(compute_health_score(&state), 100.0);
    }

    #[test]
    fn testnet_chain_halves_the_adaptive_target() {
        let mut mainnet = base_state();
        mainnet.chain_id = 8453;
        mainnet.native_balance_eth = 0.25;

        let mut testnet = base_state();
        testnet.chain_id = 84532;
        testnet.native_balance_eth = 0.25;

        assert!(compute_health_score(&testnet) > compute_health_score(&mainnet));
    }

    #[test]
    fn zero_activity_with_positive_balance_still_scores_a_floor() {
        let mut state = base_state();
        state.native_balance_eth = 0.01;
        state.runway_days = 0.0;
        state.sponsorships_trailing_24h = 0;

        assert!(compute_health_score(&state) > 0.0);
    }

    #[test]
    fn health_score_is_non_decreasing_in_balance_below_target() {
        let mut lower = base_state();
        lower.chain_id = 8453;
        lower.runway_days = 15.0;
        lower.sponsorships_trailing_24h = 5;
        lower.native_balance_eth = 0.1;

        let mut higher = lower.clone();
        higher.native_balance_eth = 0.3;

        assert!(compute_health_score(&higher) >= compute_health_score(&lower));
    }
}
