use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::auth::ServerState;
use crate::errors::ApiError;
use crate::ws;

pub mod auth;
pub mod descriptors;
pub mod drinks;
pub mod reviews;
pub mod shops;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Parse a record id supplied as a query-string value. A value that is
/// not an integer is a client error, distinct from a missing record.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::BadRequest(format!("invalid id {raw:?}")))
}

/// Parse an optional 1-based page number; absent means the first page.
pub(crate) fn parse_page(raw: Option<&str>) -> Result<usize, ApiError> {
    match raw {
        None => Ok(1),
        Some(p) => p.parse::<usize>().map_err(|_| ApiError::BadRequest(format!("invalid page {p:?}"))),
    }
}

/// Build the full application router.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/shops/", get(shops::list_or_get).post(shops::create).put(shops::update))
        .route("/drink/", get(drinks::get_one).post(drinks::create).put(drinks::update))
        .route("/drink/upload", post(drinks::upload_photo))
        .route("/reviews/", get(reviews::list).post(reviews::create).put(reviews::update))
        .route(
            "/descriptors/",
            get(descriptors::list).post(descriptors::create).put(descriptors::update),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/users/me", get(users::me).put(users::update_me).delete(users::delete_me))
        .route("/users/me/upload", post(users::upload_photo))
        .route("/ws", get(ws::upgrade))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
