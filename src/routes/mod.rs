use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::startup::AppState;

mod catalog;
mod health;
mod metrics;
mod session;

pub fn create_router(allow_cors: bool) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/catalog", get(catalog::list))
        .route("/session/ws", get(session::connect_player_to_websocket))
        .layer(if allow_cors {
            log::info!("CorsLayer Permissive");
            CorsLayer::permissive()
        } else {
            CorsLayer::default()
        })
}
