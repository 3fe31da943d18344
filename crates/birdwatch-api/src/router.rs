//! Axum router construction for the owner API.
//!
//! Owner routes are built once per [`OwnerKind`] and merged, so users and
//! examples share handlers but never each other's data.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Extension, Router};
use birdwatch_types::OwnerKind;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health`
/// - `POST /users`, `PUT /users/{id}`, `GET /users/stats`,
///   `POST /users/observations`
/// - the same four routes under `/example`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let owners = OwnerKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(owner_routes(kind)));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(owners)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn owner_routes(kind: OwnerKind) -> Router<Arc<AppState>> {
    let prefix = kind.route_prefix();
    Router::new()
        .route(&format!("/{prefix}"), post(handlers::register))
        .route(&format!("/{prefix}/stats"), get(handlers::stats))
        .route(
            &format!("/{prefix}/observations"),
            post(handlers::record_observation),
        )
        .route(&format!("/{prefix}/{{id}}"), put(handlers::update))
        .layer(Extension(kind))
}
