// [libs/infra/state-store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS STATE STORE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: PERSISTENCIA COMPARTIDA DEL PLANO DE CONTROL
 *
 * Every stateful concept in the control plane (reserve record, breaker
 * state, queue entries, rate-limit windows) is a JSON blob behind a
 * string key. This crate is the only place that knows whether those
 * blobs live in a process-local map or a shared Redis instance.
 * =================================================================
 */

mod errors;
mod in_memory;
mod redis_store;
mod store;

pub use errors::StateStoreError;
pub use in_memory::InMemoryStateStore;
pub use redis_store::RedisStateStore;
pub use store::{StateStore, StateStoreJsonExt};

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::warn;

static STATE_STORE: OnceCell<Arc<dyn StateStore>> = OnceCell::const_new();

/// Resolves the process-wide state store, connecting to Redis on first
/// call when a URL is configured and falling back to an in-memory store
/// if the connection cannot be established. Subsequent calls return the
/// same instance regardless of the arguments passed — the backend is
/// decided once, at process start.
pub async fn resolve_state_store(redis_url: Option<&str>) -> Arc<dyn StateStore> {
    STATE_STORE
        .get_or_init(|| async {
            match redis_url {
                Some(url) if !url.is_empty() => match RedisStateStore::connect(url).await {
                    Ok(store) => Arc::new(store) as Arc<dyn StateStore>,
                    Err(err) => {
                        warn!(
                            error = %err,
                            "⚠️  [STATE_STORE]: redis unreachable, degrading to in-memory backend"
                        );
                        Arc::new(InMemoryStateStore::new()) as Arc<dyn StateStore>
                    }
                },
                _ => Arc::new(InMemoryStateStore::new()) as Arc<dyn StateStore>,
            }
        })
        .await
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_in_memory_when_no_redis_url_is_configured() {
        let store = resolve_state_store(None).await;
        store.set("probe", "1", None).await.unwrap();
        assert_eq!(store.get("probe").await.unwrap().as_deref(), Some("1"));
    }
}
