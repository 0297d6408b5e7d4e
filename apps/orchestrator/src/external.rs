// [apps/orchestrator/src/external.rs]
/*!
 * =================================================================
 * APARATO: EXCLUDED COLLABORATOR BOUNDARIES (V1.0)
 * CLASIFICACIÓN: PORT LAYER (ESTRATO L3)
 * RESPONSABILIDAD: FRONTERAS DE I/O DELIBERADAMENTE FUERA DE ALCANCE
 *
 * The chain signer/bundler, RPC observers, the LLM reasoning adapter,
 * and the transparency-post formatter are all out of scope. Each gets
 * a trait here so the rest of the crate can be built and tested against
 * it; the in-memory/no-op implementations are stand-ins a deployment
 * swaps out for a real adapter, not a claim of production behavior.
 * =================================================================
 */

use aegis_domain_models::{Decision, ExecutionMode, Observation, SponsorTransactionParams};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Result of invoking the sponsor-execution path in the configured mode.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOutcome {
    pub success: bool,
    pub tx_hash: Option<String>,
    pub user_op_hash: Option<String>,
    pub actual_cost_usd: Option<f64>,
    pub error: Option<String>,
}

impl ExecuteOutcome {
    pub fn ok(tx_hash: impl Into<String>, actual_cost_usd: f64) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash.into()),
            user_op_hash: None,
            actual_cost_usd: Some(actual_cost_usd),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()), ..Default::default() }
    }
}

/// The signing/bundler/receipt-polling layer. A `SIMULATION` or
/// `READONLY` execution mode never reaches a real implementation of
/// this trait; callers branch on `ExecutionMode` before invoking it.
#[async_trait]
pub trait ExecuteAdapter: Send + Sync {
    async fn sponsor_transaction(&self, params: &SponsorTransactionParams, mode: ExecutionMode) -> ExecuteOutcome;
}

/// Always reports success without touching a chain. Useful for the
/// `SIMULATION` execution mode and for tests; never wire this into a
/// `LIVE` deployment.
pub struct SimulatedExecuteAdapter;

#[async_trait]
impl ExecuteAdapter for SimulatedExecuteAdapter {
    async fn sponsor_transaction(&self, params: &SponsorTransactionParams, _mode: ExecutionMode) -> ExecuteOutcome {
        ExecuteOutcome::ok(format!("0xsimulated-{}", params.agent_wallet_address), params.estimated_cost_usd)
    }
}

/// The LLM reasoning step that turns one cycle's observations and
/// recent memories into a single `Decision`.
#[async_trait]
pub trait ReasoningAdapter: Send + Sync {
    async fn reason(&self, observations: &[Observation], memories: &[crate::memory::MemoryRecord]) -> Decision;
}

/// A reasoning stand-in that always waits: useful where no observations
/// warrant a `SPONSOR_TRANSACTION` proposal, and as the default when no
/// reasoning adapter has been wired up.
pub struct NoopReasoningAdapter;

#[async_trait]
impl ReasoningAdapter for NoopReasoningAdapter {
    async fn reason(&self, observations: &[Observation], _memories: &[crate::memory::MemoryRecord]) -> Decision {
        if observations.is_empty() {
            Decision::wait("no observations this cycle")
        } else {
            Decision::wait("reasoning adapter not configured")
        }
    }
}

/// RPC/explorer reads the reserve-pipeline and gas-sponsorship modes
/// depend on. All excluded from this crate's scope; a real adapter
/// wraps an RPC client and an explorer HTTP client behind this.
#[async_trait]
pub trait BlockchainObserver: Send + Sync {
    async fn current_gas_price_gwei(&self) -> Option<f64>;
    async fn wallet_balances(&self) -> Option<(f64, f64)>;
    async fn agent_transaction_count(&self, agent_address: &str) -> Option<u64>;
    /// Opportunities the gas-sponsorship mode's `observe()` fans out to
    /// when the reserve is healthy enough to consider new sponsorships.
    async fn sponsorship_opportunities(&self) -> Vec<Observation>;
}

pub struct NoopBlockchainObserver;

#[async_trait]
impl BlockchainObserver for NoopBlockchainObserver {
    async fn current_gas_price_gwei(&self) -> Option<f64> {
        None
    }
    async fn wallet_balances(&self) -> Option<(f64, f64)> {
        None
    }
    async fn agent_transaction_count(&self, _agent_address: &str) -> Option<u64> {
        None
    }
    async fn sponsorship_opportunities(&self) -> Vec<Observation> {
        Vec::new()
    }
}

/// Publishes a post to the external transparency channel (Farcaster,
/// Discord, whatever a deployment wires up). Returns whether the post
/// actually went out, independent of whether the post-rate-limiter
/// admitted the attempt.
#[async_trait]
pub trait TransparencyPoster: Send + Sync {
    async fn publish(&self, category: &str, message: &str) -> bool;
}

pub struct NoopTransparencyPoster;

#[async_trait]
impl TransparencyPoster for NoopTransparencyPoster {
    async fn publish(&self, _category: &str, _message: &str) -> bool {
        true
    }
}

const SIGNATURE_MAX_SKEW_SECONDS: i64 = 5 * 60;

fn constant_time_hex_eq(candidate_hex: &str, expected: &[u8]) -> bool {
    match hex::decode(candidate_hex) {
        Ok(candidate) => candidate.len() == expected.len() && candidate.ct_eq(expected).into(),
        Err(_) => false,
    }
}

fn hmac_sha256(secret: &str, payload: &str) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Verifies a queued sponsorship request's signature: payload is
/// `"<agent_address>:<protocol_id>:<signature_timestamp>"`, timestamp in
/// Unix milliseconds, compared against `now_unix_ms` within ±5 minutes.
pub fn verify_request_signature(
    secret: &str,
    agent_address: &str,
    protocol_id: &str,
    signature_timestamp_ms: i64,
    signature_hex: &str,
    now_unix_ms: i64,
) -> bool {
    let skew_seconds = (now_unix_ms - signature_timestamp_ms).abs() / 1000;
    if skew_seconds > SIGNATURE_MAX_SKEW_SECONDS {
        return false;
    }

    let payload = format!("{agent_address}:{protocol_id}:{signature_timestamp_ms}");
    let expected = hmac_sha256(secret, &payload);
    constant_time_hex_eq(signature_hex, &expected)
}

/// Verifies a protocol webhook's signature: payload is
/// `"<timestamp>.<json body>"`, timestamp in Unix seconds, compared
/// against `now_unix_seconds` within ±5 minutes.
pub fn verify_webhook_signature(
    secret: &str,
    timestamp_unix_seconds: i64,
    body: &str,
    signature_hex: &str,
    now_unix_seconds: i64,
) -> bool {
    let skew_seconds = (now_unix_seconds - timestamp_unix_seconds).abs();
    if skew_seconds > SIGNATURE_MAX_SKEW_SECONDS {
        return false;
    }

    let payload = format!("{timestamp_unix_seconds}.{body}");
    let expected = hmac_sha256(secret, &payload);
    constant_time_hex_eq(signature_hex, &expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_signature_round_trips() {
        let secret = "shared-secret";
        let now = 1_700_000_000_000i64;
        let payload = format!("0xagent:protocol-a:{now}");
        let signature = hex::encode(hmac_sha256(secret, &payload));

        assert!(verify_request_signature(secret, "0xagent", "protocol-a", now, &signature, now));
    }

    #[test]
    fn request_signature_rejects_stale_timestamp() {
        let secret = "shared-secret";
        let now = 1_700_000_000_000i64;
        let stale = now - (10 * 60 * 1000);
        let payload = format!("0xagent:protocol-a:{stale}");
        let signature = hex::encode(hmac_sha256(secret, &payload));

        assert!(!verify_request_signature(secret, "0xagent", "protocol-a", stale, &signature, now));
    }

    #[test]
    fn request_signature_rejects_single_bit_mutation() {
        let secret = "shared-secret";
        let now = 1_700_000_000_000i64;
        let payload = format!("0xagent:protocol-a:{now}");
        let mut signature_bytes = hmac_sha256(secret, &payload);
        signature_bytes[0] ^= 0x01;
        let mutated = hex::encode(signature_bytes);

        assert!(!verify_request_signature(secret, "0xagent", "protocol-a", now, &mutated, now));
    }

    #[test]
    fn webhook_signature_round_trips() {
        let secret = "webhook-secret";
        let now = 1_700_000_000i64;
        let body = r#"{"event":"budget_topup"}"#;
        let payload = format!("{now}.{body}");
        let signature = hex::encode(hmac_sha256(secret, &payload));

        assert!(verify_webhook_signature(secret, now, body, &signature, now));
    }
}
