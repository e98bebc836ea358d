use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;

use models::{User, UserPatch};
use service::users;

use crate::auth::{require_caller, ServerState};
use crate::errors::ApiError;
use crate::routes::drinks::read_photo_part;

pub async fn me(State(state): State<ServerState>, headers: HeaderMap) -> Result<Json<User>, ApiError> {
    let caller = require_caller(&state, &headers)?;
    let user = users::get_profile(state.store.as_ref(), caller.user_id).await?;
    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    let caller = require_caller(&state, &headers)?;
    let user = users::update_profile(state.store.as_ref(), caller.user_id, patch).await?;
    Ok(Json(user))
}

/// Delete the caller's account; their reviews survive with the author
/// cleared.
pub async fn delete_me(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let caller = require_caller(&state, &headers)?;
    users::delete_account(state.store.as_ref(), caller.user_id).await?;
    Ok(Json(serde_json::json!({ "deleted": caller.user_id })))
}

pub async fn upload_photo(
    State(state): State<ServerState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<User>, ApiError> {
    let caller = require_caller(&state, &headers)?;
    let bytes = read_photo_part(multipart).await?;
    let user = users::attach_photo(state.store.as_ref(), caller.user_id, bytes).await?;
    Ok(Json(user))
}
