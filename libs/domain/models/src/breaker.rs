// [libs/domain/models/src/breaker.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GasSample {
    pub timestamp: DateTime<Utc>,
    pub price_gwei: f64,
}

/// Persisted breaker state, shared across processes through the state
/// store under `keys::BREAKER_STATE` (1h TTL).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakerState {
    pub is_open: bool,
    pub open_reason: Option<String>,
    pub opened_at: Option<DateTime<Utc>>,
    pub gas_samples: Vec<GasSample>,
    pub last_runway_hours: Option<f64>,
    pub last_check_at: Option<DateTime<Utc>>,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self {
            is_open: false,
            open_reason: None,
            opened_at: None,
            gas_samples: Vec::new(),
            last_runway_hours: None,
            last_check_at: None,
        }
    }
}
