// [libs/domain/models/src/rate_limit.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Monthly transparency-post budget, keyed by category. Lives at
/// `keys::POST_RATE_LIMIT_STATE`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostRateLimitState {
    /// `YYYY-MM`.
    pub month: String,
    pub used_by_category: HashMap<String, u32>,
    pub total_used: u32,
    pub last_reset_at: DateTime<Utc>,
}

impl PostRateLimitState {
    pub fn fresh(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            used_by_category: HashMap::new(),
            total_used: 0,
            last_reset_at: Utc::now(),
        }
    }
}
