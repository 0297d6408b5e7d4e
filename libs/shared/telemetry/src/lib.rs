// [libs/shared/telemetry/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AEGIS TELEMETRY BOOTSTRAP (V1.0)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: INICIALIZACIÓN DE TRAZADO ESTRUCTURADO Y CAPTURA DE PÁNICOS
 *
 * Dev builds get compact, colorized output. Release builds get flattened
 * JSON suitable for ingestion by a log pipeline. A global panic hook logs
 * the panic location and payload through `tracing::error!` before the
 * process unwinds, so a background cycle that panics still leaves a trace.
 * =================================================================
 */

use std::panic;
use tracing::{error, info, instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

/// Initializes the global `tracing` subscriber for the named service.
///
/// # Behavior
/// - Debug builds: compact, human-readable output without module targets.
/// - Release builds: flattened JSON events, one per line.
///
/// # Panics
/// Panics if a global subscriber has already been installed in this process.
#[instrument(skip_all)]
pub fn init_tracing(service_name: &str) {
    let environmental_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}={level},tower_http=warn,hyper=warn,redis=warn",
            service_name,
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().compact().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    }

    install_panic_hook(service_name);

    info!("👁️  [TELEMETRY]: tracing initialized for [{}]", service_name);
}

/// Logs panics through `tracing::error!` in addition to the default hook.
fn install_panic_hook(service_name: &str) {
    let service_name = service_name.to_string();

    panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");

        error!(
            target: "panic_monitor",
            service = %service_name,
            location = %location,
            "🔥 [PANIC]: thread terminated: {}",
            payload
        );
    }));
}
