// [libs/infra/sponsorship-queue/src/queue.rs]
use crate::errors::QueueError;
use crate::{list, lock};
use aegis_domain_models::keys;
use aegis_domain_models::sponsorship::{
    NewSponsorshipRequest, RequestMetadata, RequestStatus, SponsorshipResult, DEFAULT_MAX_RETRIES,
};
use aegis_domain_models::SponsorshipRequest;
use aegis_state_store::{StateStore, StateStoreJsonExt};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

const HISTORY_CAP: usize = 1000;
const RECORD_TTL_SECONDS: u64 = 24 * 60 * 60;
const STALE_AFTER_MINUTES: i64 = 5;

#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

async fn load_request(store: &dyn StateStore, id: &str) -> Result<Option<SponsorshipRequest>, QueueError> {
    Ok(store.get_json::<SponsorshipRequest>(&keys::queue_request(id)).await?)
}

async fn save_request(store: &dyn StateStore, request: &SponsorshipRequest) -> Result<(), QueueError> {
    store
        .set_json(&keys::queue_request(&request.id), request, Some(RECORD_TTL_SECONDS))
        .await?;
    Ok(())
}

/// Acquires the lock (one retry after 100ms), writes the request
/// record, and pushes it to the tail of `pending`. Returns `(id,
/// position)`.
pub async fn enqueue(store: &dyn StateStore, partial: NewSponsorshipRequest) -> Result<(String, usize), QueueError> {
    if !lock::acquire_for_enqueue(store).await {
        return Err(QueueError::LockUnavailable);
    }

    let id = Uuid::new_v4().to_string();
    let request = SponsorshipRequest {
        id: id.clone(),
        protocol_id: partial.protocol_id,
        agent_address: partial.agent_address,
        agent_display_name: partial.agent_display_name,
        target_contract: partial.target_contract,
        calldata: partial.calldata,
        estimated_gas_units: partial.estimated_gas_units,
        estimated_cost_usd: partial.estimated_cost_usd,
        max_gas_limit: partial.max_gas_limit,
        metadata: RequestMetadata {
            source: partial.source,
            enqueued_at: Utc::now(),
            signature: partial.signature,
            signature_timestamp: partial.signature_timestamp,
        },
        status: RequestStatus::Pending,
        processing_started_at: None,
        completed_at: None,
        failed_at: None,
        result: SponsorshipResult::default(),
        retry_count: 0,
        max_retries: DEFAULT_MAX_RETRIES,
    };

    let result = async {
        save_request(store, &request).await?;
        let position = list::push_back(store, keys::QUEUE_PENDING, &id).await?;
        Ok::<usize, QueueError>(position)
    }
    .await;

    lock::release(store).await;
    let position = result?;
    info!(request_id = %id, position, "📥 [QUEUE]: sponsorship request enqueued");
    Ok((id, position))
}

/// Acquires the lock (single attempt, no retry), pops the head of
/// `pending`, and transitions the record to `processing`. Returns
/// `None` (without error) on an empty queue, a lock miss, or a record
/// that expired out from under its id.
pub async fn dequeue(store: &dyn StateStore) -> Result<Option<SponsorshipRequest>, QueueError> {
    if !lock::try_acquire_once(store).await {
        return Ok(None);
    }

    let outcome = async {
        let Some(id) = list::pop_front(store, keys::QUEUE_PENDING).await? else {
            return Ok::<Option<SponsorshipRequest>, QueueError>(None);
        };

        let Some(mut request) = load_request(store, &id).await? else {
            warn!(request_id = %id, "⚠️  [QUEUE]: dequeued id has no backing record (TTL expired)");
            return Ok(None);
        };

        request.status = RequestStatus::Processing;
        request.processing_started_at = Some(Utc::now());
        save_request(store, &request).await?;
        list::push_back(store, keys::QUEUE_PROCESSING, &id).await?;

        Ok(Some(request))
    }
    .await;

    lock::release(store).await;
    outcome
}

pub async fn complete(
    store: &dyn StateStore,
    id: &str,
    tx_hash: Option<String>,
    user_op_hash: Option<String>,
    actual_cost_usd: Option<f64>,
) -> Result<(), QueueError> {
    let mut request = load_request(store, id)
        .await?
        .ok_or_else(|| QueueError::RequestNotFound(id.to_string()))?;

    request.status = RequestStatus::Completed;
    request.completed_at = Some(Utc::now());
    request.result = SponsorshipResult { tx_hash, user_op_hash, actual_cost_usd, error: None };
    save_request(store, &request).await?;

    let locked = lock::try_acquire_once(store).await;
    list::remove(store, keys::QUEUE_PROCESSING, id).await?;
    list::push_front_capped(store, keys::QUEUE_COMPLETED, id, HISTORY_CAP).await?;
    if locked {
        lock::release(store).await;
    }

    info!(request_id = %id, "✅ [QUEUE]: sponsorship request completed");
    Ok(())
}

/// `retryable` requests under the retry budget re-enter `pending` with
/// an incremented `retryCount`; everything else moves to `failed`.
pub async fn fail(store: &dyn StateStore, id: &str, error: &str, retryable: bool) -> Result<(), QueueError> {
    let mut request = load_request(store, id)
        .await?
        .ok_or_else(|| QueueError::RequestNotFound(id.to_string()))?;

    let locked = lock::try_acquire_once(store).await;
    list::remove(store, keys::QUEUE_PROCESSING, id).await?;

    if retryable && request.retry_count < request.max_retries {
        request.retry_count += 1;
        request.status = RequestStatus::Pending;
        request.result.error = Some(error.to_string());
        save_request(store, &request).await?;
        list::push_back(store, keys::QUEUE_PENDING, id).await?;
        warn!(request_id = %id, retry_count = request.retry_count, "🔁 [QUEUE]: sponsorship request re-queued for retry");
    } else {
        request.status = RequestStatus::Failed;
        request.failed_at = Some(Utc::now());
        request.result.error = Some(error.to_string());
        save_request(store, &request).await?;
        list::push_front_capped(store, keys::QUEUE_FAILED, id, HISTORY_CAP).await?;
        warn!(request_id = %id, error, "❌ [QUEUE]: sponsorship request failed permanently");
    }

    if locked {
        lock::release(store).await;
    }
    Ok(())
}

pub async fn reject(store: &dyn StateStore, id: &str, reason: &str) -> Result<(), QueueError> {
    fail(store, id, &format!("Rejected: {reason}"), false).await
}

pub async fn get_status(store: &dyn StateStore, id: &str) -> Result<Option<SponsorshipRequest>, QueueError> {
    load_request(store, id).await
}

pub async fn get_stats(store: &dyn StateStore) -> Result<QueueStats, QueueError> {
    Ok(QueueStats {
        pending: list::len(store, keys::QUEUE_PENDING).await?,
        processing: list::len(store, keys::QUEUE_PROCESSING).await?,
        completed: list::len(store, keys::QUEUE_COMPLETED).await?,
        failed: list::len(store, keys::QUEUE_FAILED).await?,
    })
}

/// For each id still listed as `processing`, drops ids whose backing
/// record has expired, and recovers ids whose processing started more
/// than 5 minutes ago (re-enqueued if retries remain, else failed).
/// Returns the number of ids acted on.
pub async fn recover_stale_requests(store: &dyn StateStore) -> Result<usize, QueueError> {
    let processing = list::load_list(store, keys::QUEUE_PROCESSING).await?;
    let now = Utc::now();
    let mut recovered = 0usize;

    for id in processing.items {
        let Some(mut request) = load_request(store, &id).await? else {
            list::remove(store, keys::QUEUE_PROCESSING, &id).await?;
            continue;
        };

        let is_stale = request
            .processing_started_at
            .map(|started| is_older_than_stale_window(started, now))
            .unwrap_or(false);

        if !is_stale {
            continue;
        }

        list::remove(store, keys::QUEUE_PROCESSING, &id).await?;

        if request.retry_count < request.max_retries {
            request.retry_count += 1;
            request.status = RequestStatus::Pending;
            request.result.error = Some("Processing timeout - recovered".to_string());
            save_request(store, &request).await?;
            list::push_back(store, keys::QUEUE_PENDING, &id).await?;
        } else {
            request.status = RequestStatus::Failed;
            request.failed_at = Some(now);
            request.result.error = Some("Processing timeout - recovered".to_string());
            save_request(store, &request).await?;
            list::push_front_capped(store, keys::QUEUE_FAILED, &id, HISTORY_CAP).await?;
        }

        recovered += 1;
    }

    if recovered > 0 {
        info!(recovered, "🧹 [QUEUE]: recovered stale processing entries");
    }

    Ok(recovered)
}

fn is_older_than_stale_window(started_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - started_at).num_minutes() > STALE_AFTER_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_domain_models::sponsorship::RequestSource;
    use aegis_state_store::InMemoryStateStore;

    fn sample_request() -> NewSponsorshipRequest {
        NewSponsorshipRequest {
            protocol_id: "demo".into(),
            agent_address: "0xabc".into(),
            agent_display_name: None,
            target_contract: None,
            calldata: None,
            estimated_gas_units: 21_000,
            estimated_cost_usd: 0.1,
            max_gas_limit: 100_000,
            source: RequestSource::Api,
            signature: None,
            signature_timestamp: None,
        }
    }

    #[tokio::test]
    async fn enqueue_then_dequeue_round_trips_through_pending() {
        let store = InMemoryStateStore::new();
        let (id, position) = enqueue(&store, sample_request()).await.unwrap();
        assert_eq!(position, 1);

        let dequeued = dequeue(&store).await.unwrap().expect("one item should dequeue");
        assert_eq!(dequeued.id, id);
        assert_eq!(dequeued.status, RequestStatus::Processing);

        let stats = get_stats(&store).await.unwrap();
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.processing, 1);
    }

    #[tokio::test]
    async fn retry_then_fail_moves_request_to_failed_after_max_retries() {
        let store = InMemoryStateStore::new();
        let (id, _) = enqueue(&store, sample_request()).await.unwrap();

        for _ in 0..DEFAULT_MAX_RETRIES {
            dequeue(&store).await.unwrap().expect("should dequeue for retry");
            fail(&store, &id, "bundler", true).await.unwrap();
        }

        dequeue(&store).await.unwrap().expect("final attempt");
        fail(&store, &id, "bundler", true).await.unwrap();

        let stats = get_stats(&store).await.unwrap();
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.processing, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.failed, 1);

        let record = get_status(&store, &id).await.unwrap().unwrap();
        assert_eq!(record.status, RequestStatus::Failed);
        assert_eq!(record.retry_count, DEFAULT_MAX_RETRIES);
    }

    #[tokio::test]
    async fn complete_moves_request_out_of_processing() {
        let store = InMemoryStateStore::new();
        let (id, _) = enqueue(&store, sample_request()).await.unwrap();
        dequeue(&store).await.unwrap();
        complete(&store, &id, Some("0xhash".into()), None, Some(0.1)).await.unwrap();

        let stats = get_stats(&store).await.unwrap();
        assert_eq!(stats.processing, 0);
        assert_eq!(stats.completed, 1);
    }

    #[tokio::test]
    async fn recover_stale_requests_re_enqueues_after_six_minutes() {
        let store = InMemoryStateStore::new();
        let (id, _) = enqueue(&store, sample_request()).await.unwrap();
        dequeue(&store).await.unwrap();

        let mut request = load_request(&store, &id).await.unwrap().expect("request persisted");
        request.processing_started_at = Some(Utc::now() - chrono::Duration::minutes(6));
        save_request(&store, &request).await.unwrap();

        let recovered = recover_stale_requests(&store).await.unwrap();
        assert_eq!(recovered, 1);

        let record = get_status(&store, &id).await.unwrap().unwrap();
        assert_eq!(record.status, RequestStatus::Pending);
        assert_eq!(record.retry_count, 1);
        assert_eq!(record.result.error.as_deref(), Some("Processing timeout - recovered"));

        let stats = get_stats(&store).await.unwrap();
        assert_eq!(stats.processing, 0);
        assert_eq!(stats.pending, 1);
    }
}
