// [apps/orchestrator/src/config.rs]
/*!
 * =================================================================
 * APARATO: AEGIS RUNTIME CONFIGURATION (V1.0)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: CARGA UNIFICADA DE VARIABLES DE ENTORNO
 *
 * One flat read of the process environment at startup, fanned out into
 * each component's own config type. Nothing here is re-read after
 * ignition — a config change requires a restart, matching every
 * sub-config's own `from_env()` convention.
 * =================================================================
 */

use aegis_economic_breaker::BreakerConfig;
use aegis_policy_engine::PolicyConfig;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentNetwork {
    Base,
    BaseSepolia,
}

impl AgentNetwork {
    fn from_env_str(raw: &str) -> Self {
        match raw {
            "base-sepolia" => AgentNetwork::BaseSepolia,
            _ => AgentNetwork::Base,
        }
    }
}

/// Execution-layer coordinates. None of these are consulted by this
/// crate directly — they're threaded through to the excluded external
/// collaborators (signer, RPC client) via `external::ExecutionContext`.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    pub network: AgentNetwork,
    pub wallet_private_key: Option<String>,
    pub agent_wallet_address: Option<String>,
    pub usdc_address: Option<String>,
    pub base_rpc_url: Option<String>,
}

impl ExecutionConfig {
    fn from_env() -> Self {
        Self {
            network: env::var("AGENT_NETWORK_ID")
                .map(|raw| AgentNetwork::from_env_str(&raw))
                .unwrap_or(AgentNetwork::Base),
            wallet_private_key: env::var("EXECUTE_WALLET_PRIVATE_KEY")
                .or_else(|_| env::var("AGENT_PRIVATE_KEY"))
                .ok(),
            agent_wallet_address: env::var("AGENT_WALLET_ADDRESS").ok(),
            usdc_address: env::var("USDC_ADDRESS").ok(),
            base_rpc_url: env::var("BASE_RPC_URL").ok(),
        }
    }

    /// Whether a LIVE-capable signer is configured. The orchestrator
    /// downgrades to SIMULATION at ignition time when this is false.
    pub fn has_signing_key(&self) -> bool {
        self.wallet_private_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ReserveConfig {
    pub target_reserve_eth: f64,
    pub critical_threshold_eth: f64,
    pub sponsorship_health_skip_threshold: f64,
}

impl Default for ReserveConfig {
    fn default() -> Self {
        Self {
            target_reserve_eth: 0.5,
            critical_threshold_eth: 0.05,
            sponsorship_health_skip_threshold: 10.0,
        }
    }
}

impl ReserveConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            target_reserve_eth: env_f64("TARGET_RESERVE_ETH", defaults.target_reserve_eth),
            critical_threshold_eth: env_f64("RESERVE_CRITICAL_ETH", defaults.critical_threshold_eth),
            sponsorship_health_skip_threshold: env_f64(
                "GAS_SPONSORSHIP_HEALTH_SKIP_THRESHOLD",
                defaults.sponsorship_health_skip_threshold,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub redis_url: Option<String>,
    pub request_signature_secret: Option<String>,
    pub protocol_webhook_secret: Option<String>,
}

impl ChannelConfig {
    fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok(),
            request_signature_secret: env::var("REQUEST_SIGNATURE_SECRET").ok(),
            protocol_webhook_secret: env::var("PROTOCOL_WEBHOOK_SECRET").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservationConfig {
    pub blockscout_api_url: Option<String>,
    pub whitelisted_low_gas_candidates: Vec<String>,
    pub whitelisted_new_wallet_candidates: Vec<String>,
    pub abuse_scam_contracts: Vec<String>,
}

impl ObservationConfig {
    fn from_env() -> Self {
        Self {
            blockscout_api_url: env::var("BLOCKSCOUT_API_URL").ok(),
            whitelisted_low_gas_candidates: env_csv("WHITELISTED_LOW_GAS_CANDIDATES"),
            whitelisted_new_wallet_candidates: env_csv("WHITELISTED_NEW_WALLET_CANDIDATES"),
            abuse_scam_contracts: env_csv("ABUSE_SCAM_CONTRACTS"),
        }
    }
}

/// Every sub-config loaded once at process startup.
#[derive(Debug, Clone)]
pub struct AegisConfig {
    pub execution: ExecutionConfig,
    pub policy: PolicyConfig,
    pub breaker: BreakerConfig,
    pub reserve: ReserveConfig,
    pub channels: ChannelConfig,
    pub observations: ObservationConfig,
    pub port: u16,
}

impl AegisConfig {
    pub fn from_env() -> Self {
        Self {
            execution: ExecutionConfig::from_env(),
            policy: PolicyConfig::from_env(),
            breaker: BreakerConfig::from_env(),
            reserve: ReserveConfig::from_env(),
            channels: ChannelConfig::from_env(),
            observations: ObservationConfig::from_env(),
            port: env::var("PORT").ok().and_then(|raw| raw.parse().ok()).unwrap_or(3000),
        }
    }
}

fn env_f64(name: &str, fallback: f64) -> f64 {
    env::var(name).ok().and_then(|raw| raw.parse().ok()).unwrap_or(fallback)
}

fn env_csv(name: &str) -> Vec<String> {
    env::var(name)
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
