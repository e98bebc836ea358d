use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use service::auth::{LoginInput, RegisterInput, TokenPair};

use crate::auth::ServerState;
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct RefreshBody {
    pub refresh: String,
}

pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<TokenPair>), ApiError> {
    let pair = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenPair>, ApiError> {
    Ok(Json(state.auth.login(input).await?))
}

/// Exchange a refresh token for a new pair. Every failure here is a
/// plain 400, including expired or wrong-kind tokens.
pub async fn refresh(
    State(state): State<ServerState>,
    Json(body): Json<RefreshBody>,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = state
        .auth
        .refresh(&body.refresh)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(pair))
}
