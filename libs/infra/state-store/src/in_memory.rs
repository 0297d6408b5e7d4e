// [libs/infra/state-store/src/in_memory.rs]
use crate::errors::StateStoreError;
use crate::store::StateStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.expires_at.map(|t| Instant::now() < t).unwrap_or(true)
    }
}

/// Process-local backend. Good enough for tests and single-replica
/// deployments; state is lost on restart and never shared across
/// processes.
pub struct InMemoryStateStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StateStoreError> {
        let mut guard = self.entries.lock().expect("state store mutex poisoned");
        match guard.get(key) {
            Some(entry) if entry.is_live() => Ok(Some(entry.value.clone())),
            Some(_) => {
                guard.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<(), StateStoreError> {
        let expires_at = ttl_seconds.map(|secs| Instant::now() + Duration::from_secs(secs));
        let mut guard = self.entries.lock().expect("state store mutex poisoned");
        guard.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn set_nx(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<bool, StateStoreError> {
        let mut guard = self.entries.lock().expect("state store mutex poisoned");
        if let Some(existing) = guard.get(key) {
            if existing.is_live() {
                return Ok(false);
            }
        }
        let expires_at = ttl_seconds.map(|secs| Instant::now() + Duration::from_secs(secs));
        guard.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), StateStoreError> {
        self.entries.lock().expect("state store mutex poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_nx_refuses_to_overwrite_a_live_key() {
        let store = InMemoryStateStore::new();
        assert!(store.set_nx("lock:a", "first", None).await.unwrap());
        assert!(!store.set_nx("lock:a", "second", None).await.unwrap());
        assert_eq!(store.get("lock:a").await.unwrap().as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn expired_entries_read_back_as_absent() {
        let store = InMemoryStateStore::new();
        store.set("ephemeral", "value", Some(0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(store.get("ephemeral").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_removes_the_key() {
        let store = InMemoryStateStore::new();
        store.set("k", "v", None).await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
