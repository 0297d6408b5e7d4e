// [libs/domain/abuse-detection/src/provider.rs]
use async_trait::async_trait;

/// Boundary to the blockchain-explorer scraper the dust-spam check
/// consults. The real adapter (an HTTP client against `BLOCKSCOUT_API_URL`)
/// is an excluded external collaborator; this crate only needs the shape
/// of its answer.
#[async_trait]
pub trait TransactionHistoryProvider: Send + Sync {
    /// USD value of the agent's most recent transactions, newest first.
    /// An empty result means "unknown", not "zero transactions" — callers
    /// must not treat it as evidence of abuse.
    async fn recent_transaction_values_usd(&self, agent_address: &str) -> Vec<f64>;
}

/// Used when no explorer URL is configured, or in tests that don't care
/// about the dust-spam gate.
pub struct NoopTransactionHistoryProvider;

#[async_trait]
impl TransactionHistoryProvider for NoopTransactionHistoryProvider {
    async fn recent_transaction_values_usd(&self, _agent_address: &str) -> Vec<f64> {
        Vec::new()
    }
}
