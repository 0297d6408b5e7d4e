// [apps/orchestrator/src/main.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR MAIN ENTRY POINT (V1.0)
 * CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L3)
 * RESPONSABILIDAD: IGNICIÓN DEL PROCESO
 * =================================================================
 */

use aegis_orchestrator::prelude::*;
use aegis_telemetry::init_tracing;
use dotenvy::dotenv;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("aegis_orchestrator");

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        info!("🛰️  [MAIN]: ignition sequence starting");

        let config = AegisConfig::from_env();
        let port = config.port;
        let kernel = OrchestratorKernel::ignite(config).await;

        info!(port, "🚀 [MAIN]: kernel ignited, launching background services");
        kernel.launch().await;

        Ok(())
    })
}
