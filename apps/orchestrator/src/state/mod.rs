// [apps/orchestrator/src/state/mod.rs]
/*!
 * =================================================================
 * APARATO: AEGIS APPLICATION STATE (V1.0)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: COMPOSICIÓN DE TODO LO QUE UN CICLO NECESITA LEER
 *
 * One `Arc`-backed handle threaded through every ticker, the queue
 * consumer, and the health route. The only thing that owns real
 * mutable state is the State Store itself; everything else here is
 * read-only configuration or a clonable adapter handle.
 * =================================================================
 */

use crate::config::AegisConfig;
use crate::external::{
    BlockchainObserver, ExecuteAdapter, NoopBlockchainObserver, NoopReasoningAdapter, NoopTransparencyPoster,
    ReasoningAdapter, SimulatedExecuteAdapter, TransparencyPoster,
};
use crate::memory::{InMemoryMemoryStore, MemoryStore};
use crate::services::SkillScheduler;
use aegis_abuse_detection::{AbuseDetectionConfig, NoopTransactionHistoryProvider, TransactionHistoryProvider};
use aegis_domain_models::ExecutionMode;
use aegis_policy_engine::PolicyRule;
use aegis_post_rate_limiter::PostRateLimiterConfig;
use aegis_state_store::StateStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AegisConfig>,
    pub store: Arc<dyn StateStore>,
    pub abuse_config: Arc<AbuseDetectionConfig>,
    pub post_rate_limiter_config: Arc<PostRateLimiterConfig>,
    pub policy_rules: Arc<Vec<Box<dyn PolicyRule>>>,
    pub execute_adapter: Arc<dyn ExecuteAdapter>,
    pub reasoning_adapter: Arc<dyn ReasoningAdapter>,
    pub blockchain_observer: Arc<dyn BlockchainObserver>,
    pub transparency_poster: Arc<dyn TransparencyPoster>,
    pub transaction_history: Arc<dyn TransactionHistoryProvider>,
    pub memory_store: Arc<dyn MemoryStore>,
    pub skill_scheduler: Arc<SkillScheduler>,
    pub draining: Arc<AtomicBool>,
}

impl AppState {
    /// Wires every collaborator to its default (in-memory / no-op)
    /// implementation. A deployment that owns a real signer, RPC
    /// client, or LLM reasoning adapter swaps those in afterward via
    /// the `with_*` builders below.
    pub async fn bootstrap(config: AegisConfig) -> Self {
        let store = aegis_state_store::resolve_state_store(config.channels.redis_url.as_deref()).await;
        let abuse_config = AbuseDetectionConfig::from_env();
        let post_rate_limiter_config = PostRateLimiterConfig::default();
        let policy_rules = aegis_policy_engine::build_default_rules();

        Self {
            config: Arc::new(config),
            store,
            abuse_config: Arc::new(abuse_config),
            post_rate_limiter_config: Arc::new(post_rate_limiter_config),
            policy_rules: Arc::new(policy_rules),
            execute_adapter: Arc::new(SimulatedExecuteAdapter),
            reasoning_adapter: Arc::new(NoopReasoningAdapter),
            blockchain_observer: Arc::new(NoopBlockchainObserver),
            transparency_poster: Arc::new(NoopTransparencyPoster),
            transaction_history: Arc::new(NoopTransactionHistoryProvider),
            memory_store: Arc::new(InMemoryMemoryStore::new()),
            skill_scheduler: Arc::new(SkillScheduler::new()),
            draining: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_execute_adapter(mut self, adapter: Arc<dyn ExecuteAdapter>) -> Self {
        self.execute_adapter = adapter;
        self
    }

    pub fn with_reasoning_adapter(mut self, adapter: Arc<dyn ReasoningAdapter>) -> Self {
        self.reasoning_adapter = adapter;
        self
    }

    pub fn with_blockchain_observer(mut self, observer: Arc<dyn BlockchainObserver>) -> Self {
        self.blockchain_observer = observer;
        self
    }

    pub fn with_transparency_poster(mut self, poster: Arc<dyn TransparencyPoster>) -> Self {
        self.transparency_poster = poster;
        self
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    pub fn begin_draining(&self) {
        self.draining.store(true, Ordering::SeqCst);
    }

    /// The execution mode a cycle should actually run in: downgraded to
    /// `SIMULATION` whenever no signing key is configured, per the
    /// ignition-time safety fallback described in the design notes.
    pub fn effective_execution_mode(&self, baseline: ExecutionMode) -> ExecutionMode {
        if baseline == ExecutionMode::Live && !self.config.execution.has_signing_key() {
            ExecutionMode::Simulation
        } else {
            baseline
        }
    }
}
