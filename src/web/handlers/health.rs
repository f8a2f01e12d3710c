// GET /api/health: reports whether the model and feature builder loaded.
//
// Always 200: a server with missing artifacts is still up, it just can't
// answer checks. Callers read the two flags.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "model_loaded": state.checker.model_loaded(),
        "helper_loaded": state.checker.helper_loaded(),
    }))
}
