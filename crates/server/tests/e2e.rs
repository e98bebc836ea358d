use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::auth::ServerState;
use server::routes;
use service::auth::{AuthService, AuthTokenConfig};
use service::pagination::Paginator;
use service::store::{EntityStore, MemoryStore};

struct TestApp {
    base_url: String,
    store: Arc<MemoryStore>,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let store = MemoryStore::new();
    let auth = Arc::new(AuthService::new(
        store.clone(),
        AuthTokenConfig {
            jwt_secret: "test-secret".into(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 3600,
        },
    ));
    let state = ServerState::new(store.clone(), auth, Paginator::new(10));
    let app: Router = routes::build_router(CorsLayer::very_permissive(), state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, store })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_register_grant_and_create_shop() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = client();

    let res = client
        .post(format!("{}/auth/register", app.base_url))
        .json(&json!({"username": "owner", "password": "pw"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    app.store.add_user_to_group(1, models::GROUP_SHOP_OWNER).await?;
    let res = client
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"username": "owner", "password": "pw"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let tokens: Value = res.json().await?;
    let access = tokens["access"].as_str().unwrap();

    let res = client
        .post(format!("{}/shops/", app.base_url))
        .bearer_auth(access)
        .json(&json!({"name": "roastery", "address": "main st 1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.get(format!("{}/shops/?id=1", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let shop: Value = res.json().await?;
    assert_eq!(shop["name"], "roastery");
    assert_eq!(shop["drinks"], json!([]));
    Ok(())
}
