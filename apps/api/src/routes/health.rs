use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and whether the generation provider handle is live.
/// Never calls the provider.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let provider_available = state.engine.is_provider_available();
    Json(json!({
        "status": if provider_available { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interview-api",
        "provider_available": provider_available,
        "model": state.engine.model(),
    }))
}
