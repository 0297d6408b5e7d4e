// [libs/domain/post-rate-limiter/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS POST RATE LIMITER (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: PRESUPUESTO MENSUAL DEL CANAL DE TRANSPARENCIA
 *
 * One State Store record tracks category usage for the external
 * transparency channel. The `emergency` category bypasses every cap
 * (advisory bookkeeping only); every other category is gated by its
 * own budget and the shared monthly total.
 * =================================================================
 */

use aegis_domain_models::keys;
use aegis_domain_models::PostRateLimitState;
use aegis_state_store::{StateStore, StateStoreJsonExt};
use chrono::Utc;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostCategory {
    Proof,
    Stats,
    Health,
    Emergency,
}

impl PostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::Proof => "proof",
            PostCategory::Stats => "stats",
            PostCategory::Health => "health",
            PostCategory::Emergency => "emergency",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostRateLimiterConfig {
    pub budgets: HashMap<&'static str, u32>,
    pub total_cap: u32,
    pub warn_ratio: f64,
}

impl Default for PostRateLimiterConfig {
    fn default() -> Self {
        let mut budgets = HashMap::new();
        budgets.insert(PostCategory::Proof.as_str(), 740);
        budgets.insert(PostCategory::Stats.as_str(), 30);
        budgets.insert(PostCategory::Health.as_str(), 180);
        budgets.insert(PostCategory::Emergency.as_str(), 50);

        Self { budgets, total_cap: 1000, warn_ratio: 0.9 }
    }
}

fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

/// Loads the persisted usage record, resetting it in place (and
/// persisting the reset) if the calendar month has rolled over.
pub async fn load_current_month(store: &dyn StateStore) -> PostRateLimitState {
    let month = current_month();
    let existing = store
        .get_json::<PostRateLimitState>(keys::POST_RATE_LIMIT_STATE)
        .await
        .unwrap_or(None);

    match existing {
        Some(state) if state.month == month => state,
        _ => {
            let fresh = PostRateLimitState::fresh(month);
            if let Err(err) = store.set_json(keys::POST_RATE_LIMIT_STATE, &fresh, None).await {
                warn!(error = %err, "⚠️  [POST_RATE_LIMIT]: reset persist failed");
            }
            fresh
        }
    }
}

/// Pure predicate: is `category` currently under budget? `emergency`
/// always answers yes.
pub fn is_within_budget(state: &PostRateLimitState, config: &PostRateLimiterConfig, category: PostCategory) -> bool {
    if category == PostCategory::Emergency {
        return true;
    }
    let used = *state.used_by_category.get(category.as_str()).unwrap_or(&0);
    let budget = *config.budgets.get(category.as_str()).unwrap_or(&0);
    used < budget && state.total_used < config.total_cap
}

/// Pure mutation: records one post against `category` and the total.
pub fn record_post(state: &mut PostRateLimitState, category: PostCategory) {
    *state.used_by_category.entry(category.as_str().to_string()).or_insert(0) += 1;
    state.total_used += 1;
}

pub struct PostCheckOutcome {
    pub allowed: bool,
    pub total_used: u32,
    pub warning: Option<String>,
}

/// Load-check-consume-persist in one call: the shape most callers want.
pub async fn check_and_consume(
    store: &dyn StateStore,
    config: &PostRateLimiterConfig,
    category: PostCategory,
) -> PostCheckOutcome {
    let mut state = load_current_month(store).await;
    let allowed = is_within_budget(&state, config, category);

    if allowed {
        record_post(&mut state, category);
        if let Err(err) = store.set_json(keys::POST_RATE_LIMIT_STATE, &state, None).await {
            warn!(error = %err, "⚠️  [POST_RATE_LIMIT]: consume persist failed");
        }
    }

    let warning = if state.total_used as f64 >= config.warn_ratio * config.total_cap as f64 {
        Some(format!(
            "monthly transparency-post budget at {}/{} ({:.0}%)",
            state.total_used,
            config.total_cap,
            100.0 * state.total_used as f64 / config.total_cap as f64
        ))
    } else {
        None
    };

    PostCheckOutcome { allowed, total_used: state.total_used, warning }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_state_store::InMemoryStateStore;

    #[tokio::test]
    async fn consumes_up_to_category_budget_then_refuses() {
        let store = InMemoryStateStore::new();
        let mut config = PostRateLimiterConfig::default();
        config.budgets.insert(PostCategory::Stats.as_str(), 2);

        assert!(check_and_consume(&store, &config, PostCategory::Stats).await.allowed);
        assert!(check_and_consume(&store, &config, PostCategory::Stats).await.allowed);
        assert!(!check_and_consume(&store, &config, PostCategory::Stats).await.allowed);
    }

    #[tokio::test]
    async fn emergency_bypasses_its_own_budget() {
        let store = InMemoryStateStore::new();
        let mut config = PostRateLimiterConfig::default();
        config.budgets.insert(PostCategory::Emergency.as_str(), 1);

        for _ in 0..5 {
            assert!(check_and_consume(&store, &config, PostCategory::Emergency).await.allowed);
        }
    }

    #[tokio::test]
    async fn monthly_reset_is_idempotent_within_the_same_month() {
        let store = InMemoryStateStore::new();
        let first = load_current_month(&store).await;
        let second = load_current_month(&store).await;
        assert_eq!(first.month, second.month);
        assert_eq!(first.total_used, second.total_used);
    }

    #[tokio::test]
    async fn warning_fires_at_ninety_percent_of_total_cap() {
        let store = InMemoryStateStore::new();
        let mut config = PostRateLimiterConfig::default();
        config.total_cap = 10;
        config.budgets.insert(PostCategory::Stats.as_str(), 10);

        let mut last_warning = None;
        for _ in 0..9 {
            last_warning = check_and_consume(&store, &config, PostCategory::Stats).await.warning;
        }
        assert!(last_warning.is_some());
    }
}
