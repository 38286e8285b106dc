// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::poller::Poller;
use crate::sampler::Sampler;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) sampler: Arc<Sampler>,
    pub(crate) poller: Arc<Poller>,
}

pub fn app(sampler: Arc<Sampler>, poller: Arc<Poller>) -> Router {
    let state = AppState { sampler, poller };
    Router::new()
        .route("/", get(|| async { "pivitals: host vitals sampler" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/system", get(http::system_handler)) // GET /api/system
        .route("/api/view", get(http::view_handler)) // GET /api/view
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
