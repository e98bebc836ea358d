use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::auth::{AuthService, AuthTokenConfig};
use service::pagination::Paginator;
use service::store::MemoryStore;

use crate::auth::ServerState;
use crate::routes;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.server.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.server.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Wire the store, auth service and paginator from configuration.
pub fn build_state(cfg: &AppConfig) -> ServerState {
    let store = MemoryStore::new();
    let auth = Arc::new(AuthService::new(
        store.clone(),
        AuthTokenConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            access_ttl_secs: cfg.auth.access_ttl_secs,
            refresh_ttl_secs: cfg.auth.refresh_ttl_secs,
        },
    ));
    ServerState::new(store, auth, Paginator::new(cfg.pagination.page_size))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_and_validate().or_else(|e| {
        info!(error = %e, "config file unavailable, falling back to defaults plus env");
        let mut cfg = AppConfig::default();
        cfg.auth.normalize_from_env();
        cfg.auth.validate()?;
        anyhow::Ok(cfg)
    })?;

    let state = build_state(&cfg);
    let app: Router = routes::build_router(build_cors(), state);

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
