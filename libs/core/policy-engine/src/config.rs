// [libs/core/policy-engine/src/config.rs]
use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    pub reserve_threshold_eth: f64,
    pub max_sponsorships_per_user_day: u32,
    pub max_sponsorships_per_minute: u32,
    pub max_sponsorships_per_protocol_minute: u32,
    pub max_sponsorship_cost_usd: f64,
    pub gas_price_max_gwei: f64,
    pub require_agent_approval: bool,
    pub gas_passport_preferential_min_sponsorships: u32,
    pub gas_passport_preferential_min_success_bps: u32,
    pub legitimacy_min_tx_count: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reserve_threshold_eth: 0.1,
            max_sponsorships_per_user_day: 3,
            max_sponsorships_per_minute: 10,
            max_sponsorships_per_protocol_minute: 5,
            max_sponsorship_cost_usd: 0.5,
            gas_price_max_gwei: 2.0,
            require_agent_approval: false,
            gas_passport_preferential_min_sponsorships: 10,
            gas_passport_preferential_min_success_bps: 9500,
            legitimacy_min_tx_count: 5,
        }
    }
}

impl PolicyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            reserve_threshold_eth: env_f64("RESERVE_THRESHOLD_ETH", defaults.reserve_threshold_eth),
            max_sponsorships_per_user_day: env_u32(
                "MAX_SPONSORSHIPS_PER_USER_DAY",
                defaults.max_sponsorships_per_user_day,
            ),
            max_sponsorships_per_minute: env_u32("MAX_SPONSORSHIPS_PER_MINUTE", defaults.max_sponsorships_per_minute),
            max_sponsorships_per_protocol_minute: env_u32(
                "MAX_SPONSORSHIPS_PER_PROTOCOL_MINUTE",
                defaults.max_sponsorships_per_protocol_minute,
            ),
            max_sponsorship_cost_usd: env_f64("MAX_SPONSORSHIP_COST_USD", defaults.max_sponsorship_cost_usd),
            gas_price_max_gwei: env_f64("GAS_PRICE_MAX_GWEI", defaults.gas_price_max_gwei),
            require_agent_approval: env_bool("REQUIRE_AGENT_APPROVAL", defaults.require_agent_approval),
            gas_passport_preferential_min_sponsorships: env_u32(
                "GAS_PASSPORT_PREFERENTIAL_MIN_SPONSORSHIPS",
                defaults.gas_passport_preferential_min_sponsorships,
            ),
            gas_passport_preferential_min_success_bps: env_u32(
                "GAS_PASSPORT_PREFERENTIAL_MIN_SUCCESS_BPS",
                defaults.gas_passport_preferential_min_success_bps,
            ),
            legitimacy_min_tx_count: defaults.legitimacy_min_tx_count,
        }
    }
}

fn env_f64(name: &str, fallback: f64) -> f64 {
    env::var(name).ok().and_then(|raw| raw.parse().ok()).unwrap_or(fallback)
}

fn env_u32(name: &str, fallback: u32) -> u32 {
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
