// [libs/infra/sponsorship-queue/src/list.rs]
use crate::errors::QueueError;
use aegis_state_store::{StateStore, StateStoreJsonExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LIST_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Wire shape for the four queue lists, matching `{items, updatedAt}`
/// from spec §6.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueueList {
    pub items: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl QueueList {
    fn fresh() -> Self {
        Self { items: Vec::new(), updated_at: Utc::now() }
    }
}

pub async fn load_list(store: &dyn StateStore, key: &str) -> Result<QueueList, QueueError> {
    Ok(store.get_json::<QueueList>(key).await?.unwrap_or_else(QueueList::fresh))
}

pub async fn save_list(store: &dyn StateStore, key: &str, mut list: QueueList) -> Result<(), QueueError> {
    list.updated_at = Utc::now();
    store.set_json(key, &list, Some(LIST_TTL_SECONDS)).await?;
    Ok(())
}

pub async fn push_back(store: &dyn StateStore, key: &str, id: &str) -> Result<usize, QueueError> {
    let mut list = load_list(store, key).await?;
    list.items.push(id.to_string());
    let position = list.items.len();
    save_list(store, key, list).await?;
    Ok(position)
}

pub async fn pop_front(store: &dyn StateStore, key: &str) -> Result<Option<String>, QueueError> {
    let mut list = load_list(store, key).await?;
    if list.items.is_empty() {
        return Ok(None);
    }
    let id = list.items.remove(0);
    save_list(store, key, list).await?;
    Ok(Some(id))
}

pub async fn remove(store: &dyn StateStore, key: &str, id: &str) -> Result<(), QueueError> {
    let mut list = load_list(store, key).await?;
    list.items.retain(|existing| existing != id);
    save_list(store, key, list).await?;
    Ok(())
}

/// Prepends `id` and trims the list to `cap`, dropping the oldest tail
/// entries -- used for `completed`/`failed`, which are bounded history,
/// not active work.
pub async fn push_front_capped(store: &dyn StateStore, key: &str, id: &str, cap: usize) -> Result<(), QueueError> {
    let mut list = load_list(store, key).await?;
    list.items.insert(0, id.to_string());
    list.items.truncate(cap);
    save_list(store, key, list).await?;
    Ok(())
}

pub async fn len(store: &dyn StateStore, key: &str) -> Result<usize, QueueError> {
    Ok(load_list(store, key).await?.items.len())
}
