// [libs/infra/sponsorship-queue/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS SPONSORSHIP QUEUE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: COLA FIFO PERSISTENTE DE SOLICITUDES DE PATROCINIO
 *
 * At-least-once FIFO over the State Store: four id lists (pending,
 * processing, completed, failed) plus one record per request. The
 * advisory lock linearizes list mutations on a best-effort basis --
 * see `lock.rs` for why enqueue alone gets a retry.
 * =================================================================
 */

mod errors;
mod list;
mod lock;
mod queue;

pub use errors::QueueError;
pub use queue::{complete, dequeue, enqueue, fail, get_stats, get_status, recover_stale_requests, reject, QueueStats};
