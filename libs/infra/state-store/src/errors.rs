// [libs/infra/state-store/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("[L3_STATE_NET_FAULT]: BACKEND_UPLINK_SEVERED -> {0}")]
    Connection(String),

    #[error("[L3_STATE_CODEC_FAULT]: VALUE_SERIALIZATION_REJECTED -> {0}")]
    Codec(#[from] serde_json::Error),

    #[error("[L3_STATE_BACKEND_FAULT]: COMMAND_EXECUTION_FAILED -> {0}")]
    Backend(String),
}

impl From<redis::RedisError> for StateStoreError {
    fn from(err: redis::RedisError) -> Self {
        StateStoreError::Backend(err.to_string())
    }
}
