//! REST endpoint handlers for the feedmock server.
//!
//! Picshare handlers serve the fixtures as-is. Animal handlers build a
//! fresh [`AnimalGenerator`] per request over the shared fixture pools.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/animals` | Small random batch |
//! | `GET` | `/animals/large` | Large random batch |
//! | `GET` | `/animals/unique` | Every known name once |
//! | `GET` | `/animals/random` | One random animal |
//! | `POST` | `/salad/send` | Echo body with 201, or 500 with `?fail=true` |
//! | `GET` | `/feed` | Static photo feed |
//! | `GET` | `/badfeed` | Malformed photo feed |
//! | `GET` | `/user/{username}/feed` | Photos owned by one user |
//! | `GET` | `/account` | Account fixture |
//! | `PUT` | `/account` | Echo body with 200 |
//! | `GET` | `/health` | Liveness and active session count |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use feedmock_core::AnimalGenerator;
use feedmock_types::{Account, Animal, Photo};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `POST /salad/send`.
#[derive(Debug, serde::Deserialize)]
pub struct SaladQuery {
    /// Any value other than `false` makes the request fail.
    pub fail: Option<String>,
}

impl SaladQuery {
    fn wants_failure(&self) -> bool {
        self.fail
            .as_deref()
            .is_some_and(|flag| !flag.eq_ignore_ascii_case("false"))
    }
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

/// Return the configured small batch of random animals.
pub async fn list_animals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Animal>>, ApiError> {
    let mut generator = AnimalGenerator::new(&state.fixtures)?;
    Ok(Json(generator.random_list(state.animals.small_batch)))
}

/// Return the configured large batch of random animals.
pub async fn list_large_animals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Animal>>, ApiError> {
    let mut generator = AnimalGenerator::new(&state.fixtures)?;
    Ok(Json(generator.random_list(state.animals.large_batch)))
}

/// Return every dog and cat name exactly once with random breed and sex.
pub async fn list_unique_animals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Animal>>, ApiError> {
    let mut generator = AnimalGenerator::new(&state.fixtures)?;
    Ok(Json(generator.all_unique()?))
}

/// Return a single random animal.
pub async fn random_animal(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Animal>, ApiError> {
    let mut generator = AnimalGenerator::new(&state.fixtures)?;
    Ok(Json(generator.random()))
}

// ---------------------------------------------------------------------------
// Echo
// ---------------------------------------------------------------------------

/// Echo the request body back with `201 Created`.
///
/// With `?fail=true` the body is ignored and a bare 500 is returned.
pub async fn send_salad(
    Query(query): Query<SaladQuery>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    if query.wants_failure() {
        debug!("salad send failing on request");
        return Err(ApiError::ClientRequestedFailure);
    }
    Ok((StatusCode::CREATED, Json(body)))
}

// ---------------------------------------------------------------------------
// Picshare
// ---------------------------------------------------------------------------

/// Return the static photo feed.
pub async fn get_feed(State(state): State<Arc<AppState>>) -> Json<Vec<Photo>> {
    Json(state.fixtures.picshare.feed.clone())
}

/// Return the malformed photo feed.
pub async fn get_bad_feed(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    Json(state.fixtures.picshare.bad_feed.clone())
}

/// Return photos owned by `username` in fixture order.
pub async fn get_user_feed(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Json<Vec<Photo>> {
    let photos = state
        .fixtures
        .user_feed(&username)
        .into_iter()
        .cloned()
        .collect();
    Json(photos)
}

/// Return the account fixture.
pub async fn get_account(State(state): State<Arc<AppState>>) -> Json<Account> {
    Json(state.fixtures.picshare.account.clone())
}

/// Echo the submitted account body.
pub async fn put_account(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Liveness probe with the number of live feed sessions.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "active_sessions": state.registry.active(),
    }))
}

/// Fallback for unmatched paths when no static directory is configured.
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_owned())
}
