// [apps/orchestrator/src/modes/mod.rs]
/*!
 * =================================================================
 * APARATO: MODE CONTRACT (V1.0)
 * CLASIFICACIÓN: CORE LOGIC (ESTRATO L1-APP)
 * RESPONSABILIDAD: FORMA COMÚN DE LOS DOS MODOS DE OPERACIÓN
 *
 * A mode owns a baseline config, a way to produce this cycle's
 * observations, an optional startup hook, and an adaptive-config
 * override. Reasoning itself is delegated to the reasoning adapter —
 * a mode never calls an LLM directly, it only shapes what gets handed
 * to one.
 * =================================================================
 */

pub mod gas_sponsorship;
pub mod reserve_pipeline;

pub use gas_sponsorship::GasSponsorshipMode;
pub use reserve_pipeline::ReservePipelineMode;

use crate::memory::MemoryRecord;
use crate::state::AppState;
use aegis_domain_models::{AgentConfig, Decision, Observation, ReserveState};
use async_trait::async_trait;

#[async_trait]
pub trait Mode: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn baseline_config(&self) -> AgentConfig;

    /// Runs once, before the mode's first tick. The default is a no-op;
    /// only reserve-pipeline overrides it.
    async fn on_start(&self, _state: &AppState) {}

    async fn observe(&self, state: &AppState) -> Vec<Observation>;

    /// Derives this cycle's effective config from the baseline and the
    /// current Reserve State. The default returns the baseline
    /// unmodified; gas-sponsorship is the only mode that overrides it.
    fn adapt_config(&self, baseline: AgentConfig, _reserve: &ReserveState) -> AgentConfig {
        baseline
    }

    /// Delegates to the configured reasoning adapter. Not an LLM call
    /// itself — this method exists so a mode-level override (none at
    /// present) could shape the prompt or memory window per mode.
    async fn reason(&self, state: &AppState, observations: &[Observation], memories: &[MemoryRecord]) -> Decision {
        state.reasoning_adapter.reason(observations, memories).await
    }
}

pub fn all_modes() -> Vec<Box<dyn Mode>> {
    vec![Box::new(ReservePipelineMode), Box::new(GasSponsorshipMode)]
}
