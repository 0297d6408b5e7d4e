// [apps/orchestrator/src/memory.rs]
/*!
 * =================================================================
 * APARATO: CYCLE MEMORY (V1.0)
 * CLASIFICACIÓN: DOMAIN SUPPORT (ESTRATO L1-APP)
 * RESPONSABILIDAD: BITÁCORA ACOTADA DE CICLOS RECIENTES POR MODO
 *
 * The real relational store a deployment might keep for audit history
 * is an excluded collaborator. What `reason()` actually needs each
 * cycle is a short recent-memory window per mode, so this keeps a
 * bounded in-process ring instead of standing up a database client.
 * =================================================================
 */

use aegis_domain_models::Decision;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

const MAX_MEMORIES_PER_MODE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Executed,
    PolicyRejected,
    BreakerOpen,
    BelowConfidence,
    Skipped,
    Errored,
}

#[derive(Debug, Clone)]
pub struct MemoryRecord {
    pub mode_id: &'static str,
    pub recorded_at: DateTime<Utc>,
    pub decision: Decision,
    pub outcome: CycleOutcome,
    pub detail: String,
}

#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn record(&self, record: MemoryRecord);
    async fn recent(&self, mode_id: &str, limit: usize) -> Vec<MemoryRecord>;
}

#[derive(Default)]
pub struct InMemoryMemoryStore {
    records: Mutex<Vec<MemoryRecord>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn record(&self, record: MemoryRecord) {
        let mut records = self.records.lock().expect("memory store mutex poisoned");
        records.push(record);

        let per_mode = records.len();
        if per_mode > MAX_MEMORIES_PER_MODE * 4 {
            let overflow = per_mode - MAX_MEMORIES_PER_MODE * 4;
            records.drain(0..overflow);
        }
    }

    async fn recent(&self, mode_id: &str, limit: usize) -> Vec<MemoryRecord> {
        let records = self.records.lock().expect("memory store mutex poisoned");
        records
            .iter()
            .rev()
            .filter(|record| record.mode_id == mode_id)
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_domain_models::Decision;

    #[tokio::test]
    async fn recent_returns_only_the_requested_mode_newest_first() {
        let store = InMemoryMemoryStore::new();
        store
            .record(MemoryRecord {
                mode_id: "reserve-pipeline",
                recorded_at: Utc::now(),
                decision: Decision::wait("first"),
                outcome: CycleOutcome::Skipped,
                detail: "first".into(),
            })
            .await;
        store
            .record(MemoryRecord {
                mode_id: "gas-sponsorship",
                recorded_at: Utc::now(),
                decision: Decision::wait("other mode"),
                outcome: CycleOutcome::Skipped,
                detail: "other mode".into(),
            })
            .await;
        store
            .record(MemoryRecord {
                mode_id: "reserve-pipeline",
                recorded_at: Utc::now(),
                decision: Decision::wait("second"),
                outcome: CycleOutcome::Executed,
                detail: "second".into(),
            })
            .await;

        let recent = store.recent("reserve-pipeline", 10).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].detail, "second");
    }
}
