use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness only; never touches the store.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let backend = state.store.backend();

    let (status, store_status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, backend, "Store ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };

    let body = json!({
        "status": if status.is_success() { "ready" } else { "not_ready" },
        "store": { "backend": backend, "status": store_status },
    });
    (status, Json(body))
}
