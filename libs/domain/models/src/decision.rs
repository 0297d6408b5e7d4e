// [libs/domain/models/src/decision.rs]
use serde::{Deserialize, Serialize};

/// Parameters specific to a `SPONSOR_TRANSACTION` decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SponsorTransactionParams {
    /// 40-hex agent wallet address (no `0x` prefix assumed either way by this type).
    pub agent_wallet_address: String,
    pub protocol_id: String,
    /// Estimated cost in USD. Must be non-negative.
    pub estimated_cost_usd: f64,
    /// Maximum gas units. Must be positive.
    pub max_gas_units: u64,
    pub target_contract: Option<String>,
}

/// Tagged action kind carried by a `Decision`. Closed enumeration — policy
/// and orchestrator code must match exhaustively, never fall through to a
/// default arm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", content = "params")]
pub enum DecisionAction {
    #[serde(rename = "SPONSOR_TRANSACTION")]
    SponsorTransaction(SponsorTransactionParams),
    #[serde(rename = "SWAP_RESERVES")]
    SwapReserves,
    #[serde(rename = "ALERT_PROTOCOL")]
    AlertProtocol { message: String },
    #[serde(rename = "WAIT")]
    Wait,
}

/// An immutable decision produced once per reasoning step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub action: DecisionAction,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub reason: String,
}

impl Decision {
    pub fn sponsor_transaction(params: SponsorTransactionParams, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            action: DecisionAction::SponsorTransaction(params),
            confidence,
            reason: reason.into(),
        }
    }

    pub fn wait(reason: impl Into<String>) -> Self {
        Self {
            action: DecisionAction::Wait,
            confidence: 1.0,
            reason: reason.into(),
        }
    }

    pub fn is_sponsor_transaction(&self) -> bool {
        matches!(self.action, DecisionAction::SponsorTransaction(_))
    }

    pub fn sponsor_params(&self) -> Option<&SponsorTransactionParams> {
        match &self.action {
            DecisionAction::SponsorTransaction(params) => Some(params),
            _ => None,
        }
    }
}
