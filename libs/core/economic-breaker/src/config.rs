// [libs/core/economic-breaker/src/config.rs]
use std::env;
use std::time::Duration;

/// Thresholds for the breaker's own gates. Distinct from the policy
/// engine's `GAS_PRICE_MAX_GWEI`, which governs a single sponsorship
/// decision rather than the shared circuit breaker.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakerConfig {
    pub enabled: bool,
    pub max_gas_price_gwei: f64,
    pub min_runway_hours: f64,
    pub min_reserve_eth: f64,
    pub min_reserve_usdc: f64,
    pub max_budget_utilization_pct: f64,
    pub gas_price_close_threshold_gwei: f64,
    pub gas_price_window: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_gas_price_gwei: 5.0,
            min_runway_hours: 24.0,
            min_reserve_eth: 0.1,
            min_reserve_usdc: 100.0,
            max_budget_utilization_pct: 90.0,
            gas_price_close_threshold_gwei: 3.0,
            gas_price_window: Duration::from_secs(5 * 60),
        }
    }
}

impl BreakerConfig {
    /// Reads every `ECONOMIC_BREAKER_*` override, falling back to the
    /// documented defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_bool("ECONOMIC_BREAKER_ENABLED", defaults.enabled),
            max_gas_price_gwei: env_f64("ECONOMIC_BREAKER_MAX_GAS_GWEI", defaults.max_gas_price_gwei),
            min_runway_hours: env_f64("ECONOMIC_BREAKER_MIN_RUNWAY_HOURS", defaults.min_runway_hours),
            min_reserve_eth: env_f64("ECONOMIC_BREAKER_MIN_RESERVE_ETH", defaults.min_reserve_eth),
            min_reserve_usdc: env_f64("ECONOMIC_BREAKER_MIN_RESERVE_USDC", defaults.min_reserve_usdc),
            max_budget_utilization_pct: env_f64(
                "ECONOMIC_BREAKER_MAX_BUDGET_PCT",
                defaults.max_budget_utilization_pct,
            ),
            gas_price_close_threshold_gwei: defaults.gas_price_close_threshold_gwei,
            gas_price_window: defaults.gas_price_window,
        }
    }
}

fn env_f64(name: &str, fallback: f64) -> f64 {
    env::var(name).ok().and_then(|raw| raw.parse().ok()).unwrap_or(fallback)
}

fn env_bool(name: &str, fallback: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|raw| match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        })
        .unwrap_or(fallback)
}
