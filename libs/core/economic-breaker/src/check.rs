// [libs/core/economic-breaker/src/check.rs]
use crate::config::BreakerConfig;
use aegis_domain_models::reserve::ProtocolBudgetState;
use aegis_domain_models::{BreakerState, GasSample};
use chrono::{Duration as ChronoDuration, Utc};
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct BreakerCheckContext {
    pub current_gas_price_gwei: Option<f64>,
    pub reserves_eth: Option<f64>,
    pub reserves_usdc: Option<f64>,
    pub estimated_runway_hours: Option<f64>,
    pub protocol_budgets: Vec<ProtocolBudgetState>,
}

#[derive(Debug, Clone, Default)]
pub struct BreakerCheckReport {
    pub is_open: bool,
    pub just_opened: bool,
    pub just_closed: bool,
    pub open_reason: Option<String>,
    pub warnings: Vec<String>,
}

/// Runs one evaluation of the breaker's gates against `state`, mutating
/// it in place, and returns a report of the resulting transition. The
/// caller is responsible for persisting `state` afterward.
pub fn check(config: &BreakerConfig, state: &mut BreakerState, ctx: &BreakerCheckContext) -> BreakerCheckReport {
    let now = Utc::now();
    let was_open = state.is_open;
    let mut warnings = Vec::new();
    let mut block_reason: Option<String> = None;

    if let Some(gwei) = ctx.current_gas_price_gwei {
        state.gas_samples.push(GasSample { timestamp: now, price_gwei: gwei });
    }
    let cutoff = now - ChronoDuration::from_std(config.gas_price_window).unwrap_or(ChronoDuration::minutes(5));
    state.gas_samples.retain(|sample| sample.timestamp > cutoff);

    if !state.gas_samples.is_empty() {
        let sum: f64 = state.gas_samples.iter().map(|s| s.price_gwei).sum();
        let moving_average = sum / state.gas_samples.len() as f64;

        let gas_gate_blocks = if was_open {
            moving_average > config.gas_price_close_threshold_gwei
        } else {
            moving_average > config.max_gas_price_gwei
        };

        if gas_gate_blocks {
            block_reason.get_or_insert_with(|| {
                format!(
                    "gas price moving average {moving_average:.2} gwei exceeds {} threshold {:.2} gwei",
                    if was_open { "close" } else { "max" },
                    if was_open { config.gas_price_close_threshold_gwei } else { config.max_gas_price_gwei },
                )
            });
        }
    }

    if let Some(runway) = ctx.estimated_runway_hours {
        if runway < config.min_runway_hours {
            block_reason.get_or_insert_with(|| {
                format!("estimated runway {runway:.2}h below minimum {:.2}h", config.min_runway_hours)
            });
        } else if runway < 2.0 * config.min_runway_hours {
            warnings.push(format!(
                "estimated runway {runway:.2}h is within 2x the minimum {:.2}h",
                config.min_runway_hours
            ));
        }
    }

    if let Some(eth) = ctx.reserves_eth {
        if eth < config.min_reserve_eth {
            block_reason
                .get_or_insert_with(|| format!("native reserve {eth:.4} ETH below minimum {:.4} ETH", config.min_reserve_eth));
        }
    }
    if let Some(usdc) = ctx.reserves_usdc {
        if usdc < config.min_reserve_usdc {
            warnings.push(format!(
                "stable reserve {usdc:.2} USDC below minimum {:.2} USDC",
                config.min_reserve_usdc
            ));
        }
    }

    for budget in &ctx.protocol_budgets {
        if budget.daily_burn_rate_usd > 0.0 {
            let hours_of_runway = (budget.balance_usd / budget.daily_burn_rate_usd) * 24.0;
            if hours_of_runway < 24.0 {
                warnings.push(format!(
                    "protocol {} budget critically low: {hours_of_runway:.2}h of runway remaining",
                    budget.protocol_id
                ));
            }
            if budget.balance_usd < 10.0 {
                warnings.push(format!(
                    "protocol {} budget depleted: ${:.2} remaining",
                    budget.protocol_id, budget.balance_usd
                ));
            }
        }
    }

    let now_open = block_reason.is_some();
    let just_opened = now_open && !was_open;
    let just_closed = !now_open && was_open;

    if now_open {
        if just_opened {
            state.opened_at = Some(now);
            warn!(reason = ?block_reason, "🔌 [BREAKER]: opened");
        }
        state.is_open = true;
        state.open_reason = block_reason.clone();
    } else if was_open {
        if let Some(opened_at) = state.opened_at {
            info!(open_duration_seconds = (now - opened_at).num_seconds(), "🔌 [BREAKER]: closed");
        }
        state.is_open = false;
        state.open_reason = None;
        state.opened_at = None;
    }

    state.last_runway_hours = ctx.estimated_runway_hours.or(state.last_runway_hours);
    state.last_check_at = Some(now);

    BreakerCheckReport {
        is_open: state.is_open,
        just_opened,
        just_closed,
        open_reason: state.open_reason.clone(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn config() -> BreakerConfig {
        BreakerConfig {
            gas_price_window: StdDuration::from_secs(300),
            ..BreakerConfig::default()
        }
    }

    fn ctx_with_gas(gwei: f64) -> BreakerCheckContext {
        BreakerCheckContext {
            current_gas_price_gwei: Some(gwei),
            ..Default::default()
        }
    }

    #[test]
    fn opens_when_moving_average_exceeds_max_threshold() {
        let cfg = config();
        let mut state = BreakerState::default();

        for gwei in [3.0, 4.0, 4.0, 8.0, 10.0] {
            check(&cfg, &mut state, &ctx_with_gas(gwei));
        }

        assert!(state.is_open);
    }

    #[test]
    fn stays_open_until_average_drops_to_close_threshold() {
        let cfg = config();
        let mut state = BreakerState::default();

        for gwei in [3.0, 4.0, 4.0, 8.0, 10.0, 4.0, 4.0, 4.0] {
            check(&cfg, &mut state, &ctx_with_gas(gwei));
        }
        assert!(state.is_open, "average stays above close threshold, breaker must remain open");

        for gwei in [2.0, 2.0, 2.0] {
            check(&cfg, &mut state, &ctx_with_gas(gwei));
        }
        assert!(!state.is_open, "average at/below close threshold must close the breaker");
    }

    #[test]
    fn low_runway_opens_independent_of_gas_price() {
        let cfg = config();
        let mut state = BreakerState::default();
        let ctx = BreakerCheckContext {
            estimated_runway_hours: Some(5.0),
            ..Default::default()
        };

        let report = check(&cfg, &mut state, &ctx);
        assert!(report.is_open);
        assert!(report.open_reason.unwrap().contains("runway"));
    }
}
