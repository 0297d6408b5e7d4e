// [libs/infra/sponsorship-queue/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("[L3_QUEUE_LOCK_FAULT]: ADVISORY_MUTEX_UNAVAILABLE")]
    LockUnavailable,

    #[error("[L3_QUEUE_RECORD_FAULT]: REQUEST_NOT_FOUND -> {0}")]
    RequestNotFound(String),

    #[error("[L3_QUEUE_STORE_FAULT]: BACKEND_OPERATION_FAILED -> {0}")]
    Store(#[from] aegis_state_store::StateStoreError),
}
