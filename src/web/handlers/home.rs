// GET /: landing page.
//
// Serves index.html from the configured public directory. When the file
// can't be read (not deployed, wrong path) a JSON descriptor of the API is
// returned instead so the root URL still says what the service is.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::web::AppState;

pub async fn home(State(state): State<AppState>) -> Response {
    let index = state.config.public_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            debug!(
                error = %e,
                path = %index.display(),
                "Landing page unavailable, serving descriptor"
            );
            Json(descriptor()).into_response()
        }
    }
}

fn descriptor() -> serde_json::Value {
    serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Duplicate question detection API",
        "endpoints": [
            { "method": "GET", "path": "/api/health" },
            { "method": "POST", "path": "/api/check", "body": { "q1": "string", "q2": "string" } },
        ],
    })
}
