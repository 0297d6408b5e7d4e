// [libs/domain/models/src/sponsorship.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestSource {
    Botchan,
    Api,
    Webhook,
    Manual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestMetadata {
    pub source: RequestSource,
    pub enqueued_at: DateTime<Utc>,
    pub signature: Option<String>,
    pub signature_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SponsorshipResult {
    pub tx_hash: Option<String>,
    pub user_op_hash: Option<String>,
    pub actual_cost_usd: Option<f64>,
    pub error: Option<String>,
}

/// A single element of the sponsorship queue. Lives at
/// `keys::queue_request(id)` with a 24h TTL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SponsorshipRequest {
    pub id: String,
    pub protocol_id: String,
    pub agent_address: String,
    pub agent_display_name: Option<String>,
    pub target_contract: Option<String>,
    pub calldata: Option<String>,
    pub estimated_gas_units: u64,
    pub estimated_cost_usd: f64,
    pub max_gas_limit: u64,
    pub metadata: RequestMetadata,
    pub status: RequestStatus,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub result: SponsorshipResult,
    pub retry_count: u32,
    pub max_retries: u32,
}

/// Fields a producer supplies when enqueueing; the queue fills in id,
/// status, timestamps, and retry bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSponsorshipRequest {
    pub protocol_id: String,
    pub agent_address: String,
    pub agent_display_name: Option<String>,
    pub target_contract: Option<String>,
    pub calldata: Option<String>,
    pub estimated_gas_units: u64,
    pub estimated_cost_usd: f64,
    pub max_gas_limit: u64,
    pub source: RequestSource,
    pub signature: Option<String>,
    pub signature_timestamp: Option<i64>,
}

pub const DEFAULT_MAX_RETRIES: u32 = 3;
