// [libs/infra/state-store/src/store.rs]
use crate::errors::StateStoreError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Shared key-value abstraction every stateful component (breaker, queue,
/// rate limiters, reserve record) reads and writes through. Two concrete
/// backends exist: an in-memory map for single-process/test deployments
/// and a Redis-backed implementation for anything that needs the state
/// to survive a restart or be shared across orchestrator replicas.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StateStoreError>;

    /// Unconditional write. `ttl_seconds` of `None` means no expiry.
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<(), StateStoreError>;

    /// Set only if absent; returns whether the write happened. Used for
    /// the queue's single-flight locks.
    async fn set_nx(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<bool, StateStoreError>;

    async fn delete(&self, key: &str) -> Result<(), StateStoreError>;
}

/// JSON convenience helpers layered over the raw string-based trait so
/// callers never hand-roll `serde_json::to_string`/`from_str` at call sites.
#[async_trait]
pub trait StateStoreJsonExt: StateStore {
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StateStoreError> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> Result<(), StateStoreError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, ttl_seconds).await
    }
}

impl<S: StateStore + ?Sized> StateStoreJsonExt for S {}
