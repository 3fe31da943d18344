//! REST endpoint handlers for the owner API.
//!
//! Every owner route is mounted once per [`OwnerKind`]; the kind arrives
//! through an [`Extension`] set by the router.
//!
//! # Endpoints
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | `GET` | `/health` | no | Liveness probe |
//! | `POST` | `/{prefix}` | no | Register an owner |
//! | `PUT` | `/{prefix}/{id}` | yes | Update an owner |
//! | `GET` | `/{prefix}/stats` | yes | Statistics for the caller |
//! | `POST` | `/{prefix}/observations` | yes | Record an observation |
//!
//! `{prefix}` is `users` or `example`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use birdwatch_types::{
    CreateOwnerRequest, NewObservation, OwnerId, OwnerKind, StatsReport, UpdateOwnerRequest,
};
use uuid::Uuid;

use crate::auth::CurrentOwner;
use crate::error::ApiError;
use crate::service::OwnerService;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report that the server is up.
#[allow(clippy::unused_async)]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// POST /{prefix}
// ---------------------------------------------------------------------------

/// Register a new owner of the route's kind.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<OwnerKind>,
    Json(request): Json<CreateOwnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = OwnerService::new(&state, kind).register(request).await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

// ---------------------------------------------------------------------------
// PUT /{prefix}/{id}
// ---------------------------------------------------------------------------

/// Update username, email or password of an existing owner.
///
/// Any authenticated owner of the same kind may call this.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<OwnerKind>,
    CurrentOwner(caller): CurrentOwner,
    Path(id): Path<String>,
    Json(request): Json<UpdateOwnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = parse_owner_id(&id)?;
    tracing::debug!(%kind, caller = %caller.username, %owner_id, "Owner update requested");
    let owner = OwnerService::new(&state, kind)
        .update(owner_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

// ---------------------------------------------------------------------------
// GET /{prefix}/stats
// ---------------------------------------------------------------------------

/// Statistics over the authenticated owner's observations.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<OwnerKind>,
    CurrentOwner(owner): CurrentOwner,
) -> Result<Json<StatsReport>, ApiError> {
    let report = OwnerService::new(&state, kind)
        .stats(&owner.username)
        .await?;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// POST /{prefix}/observations
// ---------------------------------------------------------------------------

/// Record a sighting for the authenticated owner.
pub async fn record_observation(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<OwnerKind>,
    CurrentOwner(owner): CurrentOwner,
    Json(observation): Json<NewObservation>,
) -> Result<impl IntoResponse, ApiError> {
    let record = OwnerService::new(&state, kind)
        .record_observation(&owner, observation)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

fn parse_owner_id(raw: &str) -> Result<OwnerId, ApiError> {
    Uuid::parse_str(raw)
        .map(OwnerId::from)
        .map_err(|e| ApiError::InvalidUuid(format!("{raw}: {e}")))
}
