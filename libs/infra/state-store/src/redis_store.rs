// [libs/infra/state-store/src/redis_store.rs]
use crate::errors::StateStoreError;
use crate::store::StateStore;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{info, instrument};

/// Redis-backed implementation. `ConnectionManager` reconnects under the
/// hood on transient failures, so a single clone of this struct is safe
/// to share across every background task in the orchestrator.
#[derive(Clone)]
pub struct RedisStateStore {
    connection: ConnectionManager,
}

impl RedisStateStore {
    #[instrument(skip(redis_url))]
    pub async fn connect(redis_url: &str) -> Result<Self, StateStoreError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StateStoreError::Connection(e.to_string()))?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(|e| StateStoreError::Connection(e.to_string()))?;

        info!("🔌 [STATE_STORE]: redis connection manager established");
        Ok(Self { connection })
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StateStoreError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<(), StateStoreError> {
        let mut conn = self.connection.clone();
        match ttl_seconds {
            Some(secs) => {
                let _: () = conn.set_ex(key, value, secs).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn set_nx(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<bool, StateStoreError> {
        let mut conn = self.connection.clone();
        let mut command = redis::cmd("SET");
        command.arg(key).arg(value).arg("NX");
        if let Some(secs) = ttl_seconds {
            command.arg("EX").arg(secs);
        }
        let reply: Option<String> = command.query_async(&mut conn).await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<(), StateStoreError> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
