// GET handlers: version, api/system, api/view

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/system: samples the host now. Any failure, including a lone
/// thermal probe failure under the strict policy, is a 500.
pub(super) async fn system_handler(State(state): State<AppState>) -> Response {
    match state.sampler.sample().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::warn!(
                error = %e,
                stage = e.stage(),
                operation = "sample",
                "Sampling failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to fetch system information {}", e),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/view: last snapshot and error held by the background poller.
pub(super) async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.poller.current_view())
}
