// Web server: Axum-based JSON API in front of the duplicate checker.
//
// Routes:
//   GET  /            landing page (index.html from the public dir, or a JSON descriptor)
//   GET  /api/health  load state of the model and feature builder
//   POST /api/check   classify a {q1, q2} pair
//   GET  /api/test    path/config diagnostics, only routed when DEBUG=True
//
// The checker is loaded once before the server starts and shared read-only.

use std::any::Any;
use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::checker::DuplicateChecker;
use crate::config::Config;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<DuplicateChecker>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, checker: DuplicateChecker) -> Self {
        Self {
            checker: Arc::new(checker),
            config: Arc::new(config),
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("dupecheck listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::home::home))
        .route("/api/health", get(handlers::health::health))
        .route("/api/check", post(handlers::check::check_duplicate));

    if state.config.debug {
        router = router.route("/api/test", get(handlers::diagnostics::diagnostics));
    }

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

/// Turn a handler panic into a 500 with the panic message, so one bad
/// request never takes the connection down without a response.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown error".to_string()
    };
    tracing::error!(panic = %message, "Request handler panicked");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, &message)
}
