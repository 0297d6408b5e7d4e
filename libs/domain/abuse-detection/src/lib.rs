// [libs/domain/abuse-detection/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS ABUSE DETECTION (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: FILTRO PREVIO DE LEGITIMIDAD DEL AGENTE
 *
 * Three checks, first abusive result wins: blacklist membership, sybil
 * sponsorship velocity, and (when an explorer is configured) a dust-
 * spam ratio over the agent's recent transaction history.
 * =================================================================
 */

mod provider;

pub use provider::{NoopTransactionHistoryProvider, TransactionHistoryProvider};

use aegis_domain_models::keys;
use aegis_rate_limit::SlidingWindowCounter;
use aegis_state_store::StateStore;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbuseVerdict {
    Clean,
    Blacklisted,
    Sybil,
    DustSpam,
}

impl AbuseVerdict {
    pub fn is_abusive(self) -> bool {
        !matches!(self, AbuseVerdict::Clean)
    }
}

#[derive(Debug, Clone)]
pub struct AbuseDetectionConfig {
    pub sybil_window: Duration,
    pub sybil_count_threshold: usize,
    pub dust_threshold_usd: f64,
    pub dust_ratio_threshold: f64,
    pub dust_min_sample: usize,
    pub blacklist: HashSet<String>,
    pub explorer_api_url: Option<String>,
}

impl Default for AbuseDetectionConfig {
    fn default() -> Self {
        Self {
            sybil_window: Duration::from_secs(24 * 60 * 60),
            sybil_count_threshold: 10,
            dust_threshold_usd: 0.01,
            dust_ratio_threshold: 0.8,
            dust_min_sample: 5,
            blacklist: HashSet::new(),
            explorer_api_url: None,
        }
    }
}

impl AbuseDetectionConfig {
    pub fn from_env() -> Self {
        let blacklist = std::env::var("ABUSE_BLACKLIST")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(|addr| addr.trim().to_ascii_lowercase())
                    .filter(|addr| !addr.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            blacklist,
            explorer_api_url: std::env::var("BLOCKSCOUT_API_URL").ok(),
            ..Default::default()
        }
    }
}

/// First-abusive-wins conjunction of blacklist, sybil velocity, and
/// (if an explorer is configured) dust-spam ratio.
pub async fn check_abuse(
    store: &dyn StateStore,
    config: &AbuseDetectionConfig,
    history: &dyn TransactionHistoryProvider,
    agent_address: &str,
) -> AbuseVerdict {
    let normalized = agent_address.to_ascii_lowercase();

    if config.blacklist.contains(&normalized) {
        return AbuseVerdict::Blacklisted;
    }

    let sybil_key = keys::sybil_window(&normalized);
    let sybil_count = SlidingWindowCounter::count_in_window(store, &sybil_key, config.sybil_window)
        .await
        .unwrap_or(0);
    if sybil_count >= config.sybil_count_threshold {
        return AbuseVerdict::Sybil;
    }

    if config.explorer_api_url.is_some() {
        let values = history.recent_transaction_values_usd(&normalized).await;
        if values.len() >= config.dust_min_sample {
            let sub_dust = values.iter().filter(|v| **v < config.dust_threshold_usd).count();
            let ratio = sub_dust as f64 / values.len() as f64;
            if ratio >= config.dust_ratio_threshold {
                return AbuseVerdict::DustSpam;
            }
        }
    }

    AbuseVerdict::Clean
}

/// Records a sponsorship against the agent's sybil window. Called after
/// a sponsorship executes, independent of the per-user daily-cap quota
/// the policy engine tracks separately.
pub async fn record_sponsorship(store: &dyn StateStore, config: &AbuseDetectionConfig, agent_address: &str) {
    let normalized = agent_address.to_ascii_lowercase();
    let key = keys::sybil_window(&normalized);
    // Quota set far above the detection threshold: this call's purpose
    // is bookkeeping, not gating, so it should essentially never refuse.
    SlidingWindowCounter::check_and_record(store, &key, config.sybil_window, usize::MAX).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_state_store::InMemoryStateStore;

    #[tokio::test]
    async fn blacklisted_address_is_flagged_before_any_store_access() {
        let store = InMemoryStateStore::new();
        let mut config = AbuseDetectionConfig::default();
        config.blacklist.insert("0xdead".into());

        let verdict = check_abuse(&store, &config, &NoopTransactionHistoryProvider, "0xDEAD").await;
        assert_eq!(verdict, AbuseVerdict::Blacklisted);
    }

    #[tokio::test]
    async fn sybil_threshold_trips_after_enough_recorded_sponsorships() {
        let store = InMemoryStateStore::new();
        let config = AbuseDetectionConfig::default();

        for _ in 0..config.sybil_count_threshold {
            record_sponsorship(&store, &config, "0xabc").await;
        }

        let verdict = check_abuse(&store, &config, &NoopTransactionHistoryProvider, "0xabc").await;
        assert_eq!(verdict, AbuseVerdict::Sybil);
    }

    #[tokio::test]
    async fn clean_wallet_with_no_explorer_configured_passes() {
        let store = InMemoryStateStore::new();
        let config = AbuseDetectionConfig::default();
        let verdict = check_abuse(&store, &config, &NoopTransactionHistoryProvider, "0xclean").await;
        assert_eq!(verdict, AbuseVerdict::Clean);
    }
}
