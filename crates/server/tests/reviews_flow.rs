use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::auth::ServerState;
use server::routes;
use service::auth::{AuthService, AuthTokenConfig};
use service::pagination::Paginator;
use service::store::{EntityStore, MemoryStore, NewDrink};

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn build_app() -> (Router, Arc<MemoryStore>) {
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
    (routes::build_router(cors(), state), store)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn register(app: &Router, username: &str) -> String {
    let body = json!({"username": username, "password": "pw"});
    let (status, tokens) = send(app, "POST", "/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    tokens["access"].as_str().unwrap().to_string()
}

async fn seed_drinks(store: &MemoryStore) {
    store.create_shop("test1", "addr").await.unwrap();
    store
        .create_drink(NewDrink { name: "latte".into(), price: "4.50".parse().unwrap(), shop: 1, volume: 250 })
        .await
        .unwrap();
    store
        .create_drink(NewDrink { name: "espresso".into(), price: "3.00".parse().unwrap(), shop: 1, volume: 40 })
        .await
        .unwrap();
}

#[tokio::test]
async fn review_listing_is_scoped_to_one_drink() {
    let (app, store) = build_app();
    seed_drinks(&store).await;
    let access = register(&app, "alice").await;

    for (drink, rating) in [(1, "4.5"), (1, "3.0"), (2, "5.0")] {
        let body = json!({"drink": drink, "overall_rating": rating});
        let (status, _) = send(&app, "POST", "/reviews/", Some(&access), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(&app, "GET", "/reviews/", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/reviews/?id=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = send(&app, "GET", "/reviews/?id=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(page["results"][0]["overall_rating"], "4.5");

    let (_, page) = send(&app, "GET", "/reviews/?id=2", None, None).await;
    assert_eq!(page["count"], 1);
}

#[tokio::test]
async fn review_update_is_author_only() {
    let (app, store) = build_app();
    seed_drinks(&store).await;
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let body = json!({"drink": 1, "notes": "bright", "overall_rating": "4.0"});
    let (status, review) = send(&app, "POST", "/reviews/", Some(&alice), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = review["id"].as_i64().unwrap();

    let patch = json!({"id": review_id, "overall_rating": "2.5"});
    let (status, _) = send(&app, "PUT", "/reviews/", None, Some(patch.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "PUT", "/reviews/", Some(&bob), Some(patch.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, updated) = send(&app, "PUT", "/reviews/", Some(&alice), Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["overall_rating"], "2.5");
    assert_eq!(updated["notes"], "bright");

    let missing = json!({"id": 1111, "notes": "x"});
    let (status, _) = send(&app, "PUT", "/reviews/", Some(&alice), Some(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_the_author_orphans_the_review() {
    let (app, store) = build_app();
    seed_drinks(&store).await;
    let alice = register(&app, "alice").await;

    let body = json!({"drink": 1, "overall_rating": "4.0"});
    let (_, review) = send(&app, "POST", "/reviews/", Some(&alice), Some(body)).await;
    let review_id = review["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", "/users/me", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&app, "GET", "/reviews/?id=1", None, None).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["author"], Value::Null);

    // An orphaned review has no author left to update it.
    let bob = register(&app, "bob").await;
    let patch = json!({"id": review_id, "notes": "mine now"});
    let (status, _) = send(&app, "PUT", "/reviews/", Some(&bob), Some(patch)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn descriptor_tree_rules() {
    let (app, _store) = build_app();
    let access = register(&app, "alice").await;

    let fruity = json!({"name": "fruity", "description": "fruit notes", "color": "#ff0000"});
    let (status, _) = send(&app, "POST", "/descriptors/", None, Some(fruity.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, created) = send(&app, "POST", "/descriptors/", Some(&access), Some(fruity)).await;
    assert_eq!(status, StatusCode::CREATED);
    let root = created["id"].as_i64().unwrap();

    let bad_color = json!({"name": "berry", "color": "red", "parent": root});
    let (status, _) = send(&app, "POST", "/descriptors/", Some(&access), Some(bad_color)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let berry = json!({"name": "berry", "color": "#00ff00", "parent": root});
    let (_, berry) = send(&app, "POST", "/descriptors/", Some(&access), Some(berry)).await;
    let child = berry["id"].as_i64().unwrap();

    // Reparenting the root under its child closes a loop.
    let cycle = json!({"id": root, "parent": child});
    let (status, err) = send(&app, "PUT", "/descriptors/", Some(&access), Some(cycle)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("cycle"));

    // Detaching with an explicit null is allowed.
    let detach = json!({"id": child, "parent": null});
    let (status, detached) = send(&app, "PUT", "/descriptors/", Some(&access), Some(detach)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detached["parent"], Value::Null);

    let (status, page) = send(&app, "GET", "/descriptors/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
}
