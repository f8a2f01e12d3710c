// GET /api/test: path and config diagnostics for debugging deployments.
//
// Only routed when DEBUG=True. Exposes filesystem paths, so it must never be
// enabled in production. URLs are reported as set/unset, not echoed back.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn diagnostics(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let index = config.public_dir.join("index.html");

    Json(serde_json::json!({
        "cwd": cwd,
        "public_dir": config.public_dir.display().to_string(),
        "index_exists": index.exists(),
        "model_path": config.model_path.display().to_string(),
        "model_exists": config.model_path.exists(),
        "model_url_set": config.model_url.is_some(),
        "model_input": config.model_input,
        "features_path": config.features_path.display().to_string(),
        "features_exists": config.features_path.exists(),
        "features_url_set": config.features_url.is_some(),
        "model_loaded": state.checker.model_loaded(),
        "helper_loaded": state.checker.helper_loaded(),
    }))
}
