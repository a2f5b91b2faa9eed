//! Discord lookup proxy: validation, status mapping and the REST client.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::Path;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::get;
use http_body_util::BodyExt;
use megatoe_server::{
    AppState, DiscordClient, LookupError, SessionManager, UserDirectory, router,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const KNOWN_ID: &str = "80351110224678912";
const MISSING_ID: &str = "80351110224678913";
const BROKEN_ID: &str = "80351110224678914";

struct FakeDirectory;

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn fetch_user(&self, id: &str) -> Result<Value, LookupError> {
        match id {
            KNOWN_ID => Ok(json!({ "id": KNOWN_ID, "username": "Nelly" })),
            MISSING_ID => Err(LookupError::UpstreamNotFound),
            _ => Err(LookupError::UpstreamError { status: 502 }),
        }
    }
}

fn app(directory: Arc<dyn UserDirectory>) -> Router {
    router(AppState::new(SessionManager::default(), directory))
}

async fn lookup(app: Router, query: &str) -> (StatusCode, Value) {
    let request = Request::get(format!("/api/lookup{query}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_id() {
    let (status, body) = lookup(app(Arc::new(FakeDirectory)), "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "User ID is required" }));

    let (status, _) = lookup(app(Arc::new(FakeDirectory)), "?id=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_id() {
    for id in ["123", "abcdefghijklmnopq", "123456789012345678901"] {
        let (status, body) = lookup(app(Arc::new(FakeDirectory)), &format!("?id={id}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{id}");
        assert_eq!(body["message"], "Invalid Discord ID format");
    }
}

#[tokio::test]
async fn test_found_user_is_wrapped() {
    let (status, body) = lookup(app(Arc::new(FakeDirectory)), &format!("?id={KNOWN_ID}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "Nelly");
}

#[tokio::test]
async fn test_upstream_failures() {
    let (status, body) = lookup(app(Arc::new(FakeDirectory)), &format!("?id={MISSING_ID}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = lookup(app(Arc::new(FakeDirectory)), &format!("?id={BROKEN_ID}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

/// Stand-in for the Discord REST API.
async fn fake_discord(Path(id): Path<String>, headers: HeaderMap) -> (StatusCode, String) {
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("Bot secret") {
        return (StatusCode::UNAUTHORIZED, "{}".to_string());
    }
    match id.as_str() {
        KNOWN_ID => (
            StatusCode::OK,
            json!({ "id": KNOWN_ID, "username": "Nelly" }).to_string(),
        ),
        BROKEN_ID => (StatusCode::OK, "not json".to_string()),
        _ => (StatusCode::NOT_FOUND, "{}".to_string()),
    }
}

async fn spawn_fake_discord() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = Router::new().route("/users/{id}", get(fake_discord));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

#[tokio::test]
async fn test_discord_client_against_stub() {
    let base = spawn_fake_discord().await;
    let client = DiscordClient::new(base.clone(), Some("secret".to_string()));

    let user = client.fetch_user(KNOWN_ID).await.unwrap();
    assert_eq!(user["username"], "Nelly");

    assert_eq!(
        client.fetch_user(MISSING_ID).await,
        Err(LookupError::UpstreamNotFound)
    );

    let err = client.fetch_user(BROKEN_ID).await.unwrap_err();
    assert!(matches!(err, LookupError::InternalError { .. }));

    let unauthorized = DiscordClient::new(base, Some("wrong".to_string()));
    assert_eq!(
        unauthorized.fetch_user(KNOWN_ID).await,
        Err(LookupError::UpstreamError { status: 401 })
    );
}

#[tokio::test]
async fn test_proxy_through_real_client() {
    let base = spawn_fake_discord().await;
    let client = DiscordClient::new(base, Some("secret".to_string()));
    let (status, body) = lookup(app(Arc::new(client)), &format!("?id={KNOWN_ID}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], KNOWN_ID);
}
