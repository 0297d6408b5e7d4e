// [apps/orchestrator/src/kernel.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR KERNEL (V1.0)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: IGNICIÓN E HILOS DE FONDO DEL PLANO DE CONTROL
 *
 * Ignition resolves the State Store backend and wires every default
 * adapter; launch spawns one ticker per mode, the queue consumer, a
 * skill-scheduler tick, and the axum health server, then blocks on
 * SIGINT/SIGTERM to begin a best-effort drain.
 * =================================================================
 */

use crate::config::AegisConfig;
use crate::modes::all_modes;
use crate::routes::build_router;
use crate::services::{spawn_mode_ticker, spawn_queue_consumer};
use crate::state::AppState;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{error, info};

const MODE_TICK_INTERVAL: Duration = Duration::from_secs(30);
const QUEUE_CONSUMER_INTERVAL: Duration = Duration::from_secs(5);
const SKILL_SCHEDULER_INTERVAL: Duration = Duration::from_secs(60);

pub struct OrchestratorKernel {
    port: u16,
    state: AppState,
}

impl OrchestratorKernel {
    pub async fn ignite(config: AegisConfig) -> Self {
        let port = config.port;
        let state = AppState::bootstrap(config).await;

        if !state.config.execution.has_signing_key() {
            info!("⚠️  [KERNEL]: no signing key configured, LIVE cycles will downgrade to SIMULATION");
        }

        Self { port, state }
    }

    pub async fn launch(self) {
        let state = self.state;

        for mode in all_modes() {
            let mode_state = state.clone();
            let mode_id = mode.id();
            info!(mode = mode_id, "🔌 [KERNEL]: spawning mode ticker");
            spawn_mode_ticker(std::sync::Arc::from(mode), mode_state, MODE_TICK_INTERVAL);
        }

        info!("🔌 [KERNEL]: spawning sponsorship queue consumer");
        spawn_queue_consumer(state.clone(), QUEUE_CONSUMER_INTERVAL);

        info!("🔌 [KERNEL]: spawning skill scheduler tick");
        let scheduler_state = state.clone();
        tokio::spawn(async move {
            loop {
                if scheduler_state.is_draining() {
                    break;
                }
                scheduler_state.skill_scheduler.run_due().await;
                tokio::time::sleep(SKILL_SCHEDULER_INTERVAL).await;
            }
        });

        let router = build_router(state.clone());
        let bind_address = SocketAddr::new("0.0.0.0".parse::<IpAddr>().unwrap(), self.port);

        info!(address = %bind_address, "🚀 [KERNEL]: listening");

        let listener = match tokio::net::TcpListener::bind(bind_address).await {
            Ok(listener) => listener,
            Err(err) => {
                error!(error = %err, "💀 [KERNEL]: failed to bind network port");
                std::process::exit(1);
            }
        };

        let shutdown_state = state.clone();
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            shutdown_state.begin_draining();
            info!("🧹 [KERNEL]: draining flag set, waiting for in-flight cycles");
        });

        if let Err(err) = server.await {
            error!(error = %err, "💀 [KERNEL]: server task failed");
            std::process::exit(1);
        }
    }
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
