// [libs/domain/models/src/config.rs]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How far execution is actually permitted to go this cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExecutionMode {
    Live,
    Simulation,
    ReadOnly,
}

/// What triggered this mode's current cycle — carried through for logging
/// and memory records, not interpreted by policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TriggerSource {
    Scheduled,
    Queue,
    Manual,
}

/// The effective policy/execution configuration for one cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub confidence_threshold: f64,
    pub execution_mode: ExecutionMode,
    pub max_gas_price_gwei: f64,
    /// Injected by the orchestrator right before policy validation; absent
    /// at mode-definition time.
    pub current_gas_price_gwei: Option<f64>,
    pub allowed_recipients: HashSet<String>,
    pub max_slippage_bps: u32,
    pub rate_limit_window_secs: u64,
    pub rate_limit_quota: u32,
    pub trigger_source: TriggerSource,
}

impl AgentConfig {
    pub fn with_current_gas_price(&self, gwei: f64) -> Self {
        let mut cloned = self.clone();
        cloned.current_gas_price_gwei = Some(gwei);
        cloned
    }
}
