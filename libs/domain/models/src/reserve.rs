// [libs/domain/models/src/reserve.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single historical burn-rate sample, kept in a bounded ring inside
/// `ReserveState::burn_rate_history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BurnSnapshot {
    pub timestamp: DateTime<Utc>,
    pub burn_rate_eth: f64,
}

/// A protocol's remaining prepaid budget and its burn rate, as fed into
/// the breaker's per-protocol gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProtocolBudgetState {
    pub protocol_id: String,
    pub balance_usd: f64,
    pub daily_burn_rate_usd: f64,
}

/// Maximum number of burn snapshots retained in history before the oldest
/// is dropped.
pub const BURN_HISTORY_CAP: usize = 168; // one week at hourly granularity

/// Single logical, shared reserve record. Lives at `keys::RESERVE_STATE`.
///
/// Invariants (enforced by `aegis-reserve-state`, not by this struct):
/// - `runway_days = native_balance_eth / daily_burn_rate_eth` when the
///   denominator is positive.
/// - `emergency_mode` implies all sponsorship observation is skipped.
/// - `health_score` is derived, never supplied directly by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReserveState {
    pub native_balance_eth: f64,
    pub stable_balance_usdc: f64,
    pub chain_id: u64,
    pub avg_burn_per_sponsorship_eth: f64,
    pub sponsorships_trailing_24h: u32,
    pub daily_burn_rate_eth: f64,
    pub runway_days: f64,
    pub target_reserve_eth: f64,
    pub critical_threshold_eth: f64,
    pub health_score: f64,
    #[serde(default)]
    pub protocol_budgets: Vec<ProtocolBudgetState>,
    pub last_updated: DateTime<Utc>,
    /// Absent on records written before this field existed; `#[serde(default)]`
    /// implements the merge-with-defaults read path from spec §4.7.
    #[serde(default)]
    pub emergency_mode: bool,
    #[serde(default)]
    pub forecasted_burn_rate_7d_eth: f64,
    #[serde(default = "infinite_runway")]
    pub forecasted_runway_7d_days: f64,
    #[serde(default)]
    pub last_external_post_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub burn_rate_history: Vec<BurnSnapshot>,
}

fn infinite_runway() -> f64 {
    f64::INFINITY
}

impl ReserveState {
    /// Defaults for a never-before-seen record, parameterized by the two
    /// config-driven thresholds (`TARGET_RESERVE_ETH`, `RESERVE_CRITICAL_ETH`).
    pub fn defaults(target_reserve_eth: f64, critical_threshold_eth: f64) -> Self {
        Self {
            native_balance_eth: 0.0,
            stable_balance_usdc: 0.0,
            chain_id: 0,
            avg_burn_per_sponsorship_eth: 0.0,
            sponsorships_trailing_24h: 0,
            daily_burn_rate_eth: 0.0,
            runway_days: f64::INFINITY,
            target_reserve_eth,
            critical_threshold_eth,
            health_score: 0.0,
            protocol_budgets: Vec::new(),
            last_updated: Utc::now(),
            emergency_mode: false,
            forecasted_burn_rate_7d_eth: 0.0,
            forecasted_runway_7d_days: f64::INFINITY,
            last_external_post_at: None,
            burn_rate_history: Vec::new(),
        }
    }

    pub fn push_burn_snapshot(&mut self, snapshot: BurnSnapshot) {
        self.burn_rate_history.push(snapshot);
        if self.burn_rate_history.len() > BURN_HISTORY_CAP {
            let overflow = self.burn_rate_history.len() - BURN_HISTORY_CAP;
            self.burn_rate_history.drain(0..overflow);
        }
    }
}
