use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and which scoring path match runs will take.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screener-api",
        "scoring": if state.matcher.uses_model() {
            state.config.matching.model_identifier.as_str()
        } else {
            "heuristic"
        }
    }))
}
