//! Axum router construction for the feedmock server.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled so the example front-ends can call it from their
//! own dev servers.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` and `GET /ws/feed` -- live photo feed (`WebSocket`)
/// - `GET /animals`, `/animals/large`, `/animals/unique`, `/animals/random`
/// - `POST /salad/send` -- echo / forced failure
/// - `GET /feed`, `GET /badfeed`, `GET /user/{username}/feed`
/// - `GET /account`, `PUT /account`
/// - `GET /health`
///
/// Unmatched paths are served from `state.static_dir` when configured,
/// otherwise they get a JSON 404.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Live feed
        .route("/", get(ws::live_feed))
        .route("/ws/feed", get(ws::live_feed))
        // Animals
        .route("/animals", get(handlers::list_animals))
        .route("/animals/large", get(handlers::list_large_animals))
        .route("/animals/unique", get(handlers::list_unique_animals))
        .route("/animals/random", get(handlers::random_animal))
        // Echo
        .route("/salad/send", post(handlers::send_salad))
        // Picshare
        .route("/feed", get(handlers::get_feed))
        .route("/badfeed", get(handlers::get_bad_feed))
        .route("/user/{username}/feed", get(handlers::get_user_feed))
        .route(
            "/account",
            get(handlers::get_account).put(handlers::put_account),
        )
        .route("/health", get(handlers::health));

    let router = match state.static_dir.clone() {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(handlers::not_found),
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
