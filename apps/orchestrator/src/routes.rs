// [apps/orchestrator/src/routes.rs]
/*!
 * =================================================================
 * APARATO: HEALTH ROUTING (V1.0)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: SONDA DE DISPONIBILIDAD DEL STATE STORE
 *
 * A single `/health` route: a set/get roundtrip against the State
 * Store under a timestamped probe key, bounded to 5 seconds. Anything
 * else (auth, CORS, admin surfaces) the teacher wired up here belongs
 * to a domain this crate does not serve.
 * =================================================================
 */

use crate::state::AppState;
use aegis_domain_models::keys;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Serialize)]
struct HealthResponse {
    connected: bool,
    message: Option<String>,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let probe_key = keys::health_probe(Utc::now().timestamp_millis());
    let outcome = tokio::time::timeout(HEALTH_PROBE_TIMEOUT, roundtrip(&state, &probe_key)).await;

    match outcome {
        Ok(Ok(())) => (StatusCode::OK, Json(HealthResponse { connected: true, message: None })),
        Ok(Err(err)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse { connected: false, message: Some(err) }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse { connected: false, message: Some("state store probe timed out".to_string()) }),
        ),
    }
}

async fn roundtrip(state: &AppState, probe_key: &str) -> Result<(), String> {
    state.store.set(probe_key, "1", Some(30)).await.map_err(|err| err.to_string())?;
    match state.store.get(probe_key).await.map_err(|err| err.to_string())? {
        Some(value) if value == "1" => Ok(()),
        Some(other) => Err(format!("state store probe returned unexpected value: {other}")),
        None => Err("state store probe key missing after write".to_string()),
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
