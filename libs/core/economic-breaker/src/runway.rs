// [libs/core/economic-breaker/src/runway.rs]
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// One historical sponsorship's gas spend, as fed into the runway
/// estimator. `gas_price_gwei` keeps its fractional part; the
/// multiplication against `gas_units` is done in fixed-point u128 so a
/// large `gas_units` never loses precision the way `f64 * f64` would.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GasSpendSample {
    pub timestamp: DateTime<Utc>,
    pub gas_units: u64,
    pub gas_price_gwei: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy)]
pub struct RunwayEstimate {
    pub runway_hours: f64,
    pub hourly_burn_eth: f64,
    pub confidence: RunwayConfidence,
    pub samples_considered: usize,
}

const MILLI_GWEI_PER_GWEI: f64 = 1_000.0;
const GWEI_PER_ETH: f64 = 1_000_000_000.0;

/// Keeps only samples within the trailing 24h, sums their native spend
/// with integer arithmetic, and derives an hourly burn rate and runway
/// from `balance_eth`. Runway is `Infinity` when nothing burned.
pub fn estimate_runway(balance_eth: f64, samples: &[GasSpendSample]) -> RunwayEstimate {
    let now = Utc::now();
    let cutoff = now - ChronoDuration::hours(24);
    let recent: Vec<&GasSpendSample> = samples.iter().filter(|s| s.timestamp > cutoff).collect();

    let total_burned_eth: f64 = recent
        .iter()
        .map(|sample| {
            let milli_gwei_price = (sample.gas_price_gwei * MILLI_GWEI_PER_GWEI).round() as u128;
            let total_milli_gwei = (sample.gas_units as u128) * milli_gwei_price;
            total_milli_gwei as f64 / MILLI_GWEI_PER_GWEI / GWEI_PER_ETH
        })
        .sum();

    let hourly_burn_eth = total_burned_eth / 24.0;
    let runway_hours = if hourly_burn_eth > 0.0 {
        balance_eth / hourly_burn_eth
    } else {
        f64::INFINITY
    };

    let confidence = match recent.len() {
        n if n >= 50 => RunwayConfidence::High,
        n if n >= 10 => RunwayConfidence::Medium,
        _ => RunwayConfidence::Low,
    };

    RunwayEstimate {
        runway_hours,
        hourly_burn_eth,
        confidence,
        samples_considered: recent.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hours_ago: i64, gas_units: u64, gas_price_gwei: f64) -> GasSpendSample {
        GasSpendSample {
            timestamp: Utc::now() - ChronoDuration::hours(hours_ago),
            gas_units,
            gas_price_gwei,
        }
    }

    #[test]
    fn zero_burn_yields_infinite_runway() {
        let estimate = estimate_runway(1.0, &[]);
        assert_eq!(estimate.runway_hours, f64::INFINITY);
        assert_eq!(estimate.confidence, RunwayConfidence::Low);
    }

    #[test]
    fn samples_outside_24h_are_excluded() {
        let samples = vec![sample(30, 21_000, 5.0)];
        let estimate = estimate_runway(1.0, &samples);
        assert_eq!(estimate.samples_considered, 0);
        assert_eq!(estimate.runway_hours, f64::INFINITY);
    }

    #[test]
    fn confidence_tiers_follow_sample_count() {
        let high: Vec<_> = (0..50).map(|_| sample(1, 21_000, 1.0)).collect();
        let medium: Vec<_> = (0..10).map(|_| sample(1, 21_000, 1.0)).collect();
        let low: Vec<_> = (0..3).map(|_| sample(1, 21_000, 1.0)).collect();

        assert_eq!(estimate_runway(1.0, &high).confidence, RunwayConfidence::High);
        assert_eq!(estimate_runway(1.0, &medium).confidence, RunwayConfidence::Medium);
        assert_eq!(estimate_runway(1.0, &low).confidence, RunwayConfidence::Low);
    }
}
