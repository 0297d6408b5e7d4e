// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS DOMAIN MODELS (V1.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATOS DE DATOS SOBERANOS DEL PLANO DE CONTROL
 *
 * Every type here is a plain, serializable record: no I/O, no behavior
 * beyond construction helpers and the few derived-field invariants the
 * spec calls out (health score, runway). Components throughout the
 * workspace read and write these shapes through the state store.
 * =================================================================
 */

pub mod breaker;
pub mod config;
pub mod decision;
pub mod keys;
pub mod observation;
pub mod rate_limit;
pub mod reserve;
pub mod sponsorship;

pub use breaker::{BreakerState, GasSample};
pub use config::{AgentConfig, ExecutionMode, TriggerSource};
pub use decision::{Decision, DecisionAction, SponsorTransactionParams};
pub use observation::{Observation, ObservationSource};
pub use rate_limit::PostRateLimitState;
pub use reserve::{BurnSnapshot, ProtocolBudgetState, ReserveState};
pub use sponsorship::{
    RequestMetadata, RequestSource, RequestStatus, SponsorshipRequest, SponsorshipResult,
};

#[cfg(test)]
mod tests_serialization;
