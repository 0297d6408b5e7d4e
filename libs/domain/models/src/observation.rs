// [libs/domain/models/src/observation.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObservationSource {
    Blockchain,
    Api,
}

/// A single, lazily-produced, non-restartable observation. Produced once
/// per tick; `data` is intentionally opaque and carried verbatim through
/// the pipeline to `reason()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: ObservationSource,
    pub chain_id: Option<u64>,
    pub data: serde_json::Value,
    pub context: String,
}

impl Observation {
    pub fn new(
        id: impl Into<String>,
        source: ObservationSource,
        chain_id: Option<u64>,
        data: serde_json::Value,
        context: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now(),
            source,
            chain_id,
            data,
            context: context.into(),
        }
    }
}
