// [apps/orchestrator/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR LIBRARY ROOT (V1.0)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN DEL ÁRBOL DE MÓDULOS
 *
 * Everything a decision cycle, the queue consumer, and the health
 * route need, composed once in `AppState` and spawned once from
 * `OrchestratorKernel`.
 * =================================================================
 */

pub mod config;
pub mod external;
pub mod kernel;
pub mod memory;
pub mod modes;
pub mod routes;
pub mod services;
pub mod state;

/// Re-exports the handful of types `main.rs` needs to boot the binary.
pub mod prelude {
    pub use crate::config::AegisConfig;
    pub use crate::kernel::OrchestratorKernel;
    pub use crate::state::AppState;
}
