// [libs/domain/models/src/keys.rs]
//! Well-known State Store key names, centralized so every crate that reads
//! or writes shared state agrees on the same string. Mirrors spec.md §6.

pub const RESERVE_STATE: &str = "aegis:reserve_state";
pub const BREAKER_STATE: &str = "economic-breaker:state";
pub const GAS_SPEND_HISTORY: &str = "economic-breaker:gas_spend_history";

pub const QUEUE_PENDING: &str = "aegis:queue:sponsorship:pending";
pub const QUEUE_PROCESSING: &str = "aegis:queue:sponsorship:processing";
pub const QUEUE_COMPLETED: &str = "aegis:queue:sponsorship:completed";
pub const QUEUE_FAILED: &str = "aegis:queue:sponsorship:failed";
pub const QUEUE_LOCK: &str = "aegis:queue:sponsorship:lock";

pub fn queue_request(id: &str) -> String {
    format!("aegis:queue:sponsorship:request:{id}")
}

pub fn agent_daily_window(agent_address: &str) -> String {
    format!("aegis:sponsorship:agent:{agent_address}:day")
}

pub const GLOBAL_MINUTE_WINDOW: &str = "aegis:sponsorship:global:minute";

pub fn protocol_minute_window(protocol_id: &str) -> String {
    format!("aegis:sponsorship:protocol:{protocol_id}:minute")
}

pub fn sybil_window(agent_address: &str) -> String {
    format!("aegis:abuse:sybil:{agent_address}")
}

pub const POST_RATE_LIMIT_STATE: &str = "social:post:monthly:usage";
pub const PREVIOUS_OBSERVATIONS: &str = "observations:previous";

pub fn health_probe(epoch_ms: i64) -> String {
    format!("aegis:health:{epoch_ms}")
}
