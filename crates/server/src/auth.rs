//! Server state and bearer-token extraction.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use tokio::sync::broadcast;

use service::auth::{AuthService, Caller};
use service::pagination::Paginator;
use service::policy::{self, Action};
use service::store::EntityStore;

use crate::errors::ApiError;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn EntityStore>,
    pub auth: Arc<AuthService>,
    pub paginator: Paginator,
    /// Fan-out channel backing the websocket endpoint.
    pub ws_tx: broadcast::Sender<String>,
}

impl ServerState {
    pub fn new(store: Arc<dyn EntityStore>, auth: Arc<AuthService>, paginator: Paginator) -> Self {
        let (ws_tx, _) = broadcast::channel(64);
        Self { store, auth, paginator, ws_tx }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Resolve the caller, rejecting requests without a valid access token.
pub fn require_caller(state: &ServerState, headers: &HeaderMap) -> Result<Caller, ApiError> {
    let token =
        bearer_token(headers).ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    Ok(state.auth.validate_access(token)?)
}

/// Resolve the caller and check the policy for `action` in one step.
pub fn authorize(state: &ServerState, headers: &HeaderMap, action: Action) -> Result<Caller, ApiError> {
    let caller = require_caller(state, headers)?;
    if !policy::allow(Some(&caller), action) {
        return Err(ApiError::Unauthorized("not permitted".into()));
    }
    Ok(caller)
}
