// [libs/core/policy-engine/src/context.rs]
use crate::config::PolicyConfig;
use aegis_abuse_detection::{AbuseDetectionConfig, TransactionHistoryProvider};
use aegis_domain_models::AgentConfig;
use aegis_state_store::StateStore;

/// Snapshot of an agent's standing in the (out-of-scope) reputation
/// system, prefetched by the caller before validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GasPassportSnapshot {
    pub sponsor_count: u32,
    pub success_rate_bps: u32,
}

/// Result of an `(protocolId, agentAddress)` approval lookup.
#[derive(Debug, Clone, Copy)]
pub struct AgentApproval {
    pub revoked: bool,
    pub daily_budget_usd: f64,
    pub running_daily_spend_usd: f64,
}

/// A dependency that the approved-agent and whitelist rules must fail
/// closed on when it errors, per spec §7's security-critical-dependency
/// handling. `Err` carries the dependency name for the rejection message.
pub type FailClosedLookup<T> = Result<T, String>;

/// Everything a rule needs beyond the `Decision` itself: the live
/// thresholds, the cycle's `AgentConfig`, the shared State Store (for
/// rate-limit/abuse bookkeeping), and the pre-fetched answers to every
/// question that would otherwise require an excluded external
/// collaborator (chain RPC, relational DB, explorer API).
pub struct PolicyContext<'a> {
    pub store: &'a dyn StateStore,
    pub config: &'a PolicyConfig,
    pub agent_config: &'a AgentConfig,
    pub abuse_config: &'a AbuseDetectionConfig,
    pub history_provider: &'a dyn TransactionHistoryProvider,

    pub agent_tx_count: Option<u64>,
    pub gas_passport: Option<GasPassportSnapshot>,
    pub agent_approval: FailClosedLookup<Option<AgentApproval>>,
    pub protocol_budget_usd: Option<f64>,
    pub reserve_balance_eth: Option<f64>,
    pub protocol_whitelist: FailClosedLookup<Option<Vec<String>>>,

    /// When false, sliding-window rules consult the window without
    /// appending to it. `evaluate` uses this to probe the full rule set
    /// before committing any counter consumption, so a decision that
    /// ultimately fails never burns quota it didn't use.
    pub record: bool,
}

impl<'a> PolicyContext<'a> {
    pub fn with_record(&self, record: bool) -> Self {
        Self {
            store: self.store,
            config: self.config,
            agent_config: self.agent_config,
            abuse_config: self.abuse_config,
            history_provider: self.history_provider,
            agent_tx_count: self.agent_tx_count,
            gas_passport: self.gas_passport,
            agent_approval: self.agent_approval.clone(),
            protocol_budget_usd: self.protocol_budget_usd,
            reserve_balance_eth: self.reserve_balance_eth,
            protocol_whitelist: self.protocol_whitelist.clone(),
            record,
        }
    }
}
