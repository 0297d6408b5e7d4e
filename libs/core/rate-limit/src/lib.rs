// [libs/core/rate-limit/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS SLIDING-WINDOW RATE LIMIT (V1.0)
 * CLASIFICACIÓN: CORE LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: CONTEO DE EVENTOS POR VENTANA DESLIZANTE
 *
 * One counter shape serves every sliding-window check the policy engine
 * and abuse detector need (per-user daily cap, global per-minute,
 * per-protocol per-minute, sybil 24h). Each key holds a JSON array of
 * event timestamps; a check reads, drops stale entries, compares the
 * remaining length to quota, and appends on pass. This is read-filter-
 * write, not a single atomic op — see module docs on why that's fine.
 * =================================================================
 */

use aegis_state_store::{StateStore, StateStoreJsonExt};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum RateLimitError {
    #[error("[L2_RATE_LIMIT_FAULT]: COUNTER_PERSISTENCE_FAILED -> {0}")]
    Store(#[from] aegis_state_store::StateStoreError),
}

/// Safety clamp applied to every persisted window regardless of quota,
/// so a misconfigured quota or burst of contention can't grow a single
/// key's JSON payload without bound.
const MAX_TRACKED_EVENTS: usize = 10_000;

pub struct SlidingWindowCounter;

impl SlidingWindowCounter {
    /// Reads the window at `key`, drops timestamps older than `window`,
    /// and — if the remaining count is under `quota` — appends `now` and
    /// persists with a TTL equal to the window. Returns whether the
    /// event was admitted. A read failure degrades to "window empty"
    /// (fail open, matching the rate-limit counters' transient-failure
    /// policy); a write failure is logged but doesn't revoke the
    /// admission already decided.
    pub async fn check_and_record(
        store: &dyn StateStore,
        key: &str,
        window: Duration,
        quota: usize,
    ) -> bool {
        let now = Utc::now();
        let cutoff = now - ChronoDuration::milliseconds(window.as_millis() as i64);

        let mut timestamps = match store.get_json::<Vec<DateTime<Utc>>>(key).await {
            Ok(existing) => existing.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, %key, "⚠️  [RATE_LIMIT]: window read failed, treating as empty");
                Vec::new()
            }
        };

        timestamps.retain(|ts| *ts > cutoff);

        if timestamps.len() >= quota {
            return false;
        }

        timestamps.push(now);
        if timestamps.len() > MAX_TRACKED_EVENTS {
            let overflow = timestamps.len() - MAX_TRACKED_EVENTS;
            timestamps.drain(0..overflow);
        }

        let ttl_seconds = window.as_secs().max(1);
        if let Err(err) = store.set_json(key, &timestamps, Some(ttl_seconds)).await {
            warn!(error = %err, %key, "⚠️  [RATE_LIMIT]: window persist failed after admission");
        }

        true
    }

    /// Non-mutating count of live events in the window, used by stats
    /// surfaces that don't want to risk an accidental admission.
    pub async fn count_in_window(
        store: &dyn StateStore,
        key: &str,
        window: Duration,
    ) -> Result<usize, RateLimitError> {
        let now = Utc::now();
        let cutoff = now - ChronoDuration::milliseconds(window.as_millis() as i64);
        let timestamps = store.get_json::<Vec<DateTime<Utc>>>(key).await?.unwrap_or_default();
        Ok(timestamps.into_iter().filter(|ts| *ts > cutoff).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_state_store::InMemoryStateStore;

    #[tokio::test]
    async fn admits_until_quota_then_blocks() {
        let store = InMemoryStateStore::new();
        let window = Duration::from_secs(60);

        for _ in 0..3 {
            assert!(SlidingWindowCounter::check_and_record(&store, "k", window, 3).await);
        }
        assert!(!SlidingWindowCounter::check_and_record(&store, "k", window, 3).await);
    }

    #[tokio::test]
    async fn stale_entries_drop_out_of_the_window() {
        let store = InMemoryStateStore::new();
        let tiny_window = Duration::from_millis(1);

        assert!(SlidingWindowCounter::check_and_record(&store, "k", tiny_window, 1).await);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(SlidingWindowCounter::check_and_record(&store, "k", tiny_window, 1).await);
    }

    #[tokio::test]
    async fn rejected_checks_do_not_grow_the_window() {
        let store = InMemoryStateStore::new();
        let window = Duration::from_secs(60);

        assert!(SlidingWindowCounter::check_and_record(&store, "k", window, 1).await);
        assert!(!SlidingWindowCounter::check_and_record(&store, "k", window, 1).await);
        assert_eq!(SlidingWindowCounter::count_in_window(&store, "k", window).await.unwrap(), 1);
    }
}
