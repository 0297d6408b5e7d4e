// [libs/infra/sponsorship-queue/src/lock.rs]
use aegis_domain_models::keys;
use aegis_state_store::StateStore;
use chrono::Utc;
use std::time::Duration;
use tracing::warn;

const LOCK_TTL_SECONDS: u64 = 5;
const ENQUEUE_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Attempts the advisory lock once; retries exactly once after 100ms.
/// Per spec §4.5 this extra retry is enqueue-specific -- every other
/// queue mutation gets a single best-effort attempt via
/// [`try_acquire_once`].
pub async fn acquire_for_enqueue(store: &dyn StateStore) -> bool {
    if try_acquire_once(store).await {
        return true;
    }
    tokio::time::sleep(ENQUEUE_RETRY_DELAY).await;
    try_acquire_once(store).await
}

pub async fn try_acquire_once(store: &dyn StateStore) -> bool {
    match store.set_nx(keys::QUEUE_LOCK, &Utc::now().to_rfc3339(), Some(LOCK_TTL_SECONDS)).await {
        Ok(acquired) => acquired,
        Err(err) => {
            warn!(error = %err, "⚠️  [QUEUE_LOCK]: acquisition attempt failed");
            false
        }
    }
}

/// Best-effort early release; the TTL reclaims the lock regardless.
pub async fn release(store: &dyn StateStore) {
    if let Err(err) = store.delete(keys::QUEUE_LOCK).await {
        warn!(error = %err, "⚠️  [QUEUE_LOCK]: release failed, will expire via TTL");
    }
}
