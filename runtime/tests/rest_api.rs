//! HTTP surface tests: a live router on an ephemeral port.

mod common;

use assert_json_diff::assert_json_include;
use async_trait::async_trait;
use common::*;
use recipe_import::auth::Authenticator;
use recipe_import::error::AuthError;
use recipe_import::import::Importer;
use recipe_import::model::{Credentials, SessionToken};
use recipe_import::rest::{self, AppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::MockServer;

/// Authenticator that accepts one fixed pair and counts its calls.
struct FixedAuthenticator {
    calls: AtomicUsize,
    set_cookie: bool,
}

impl FixedAuthenticator {
    fn new(set_cookie: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            set_cookie,
        })
    }
}

#[async_trait]
impl Authenticator for FixedAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if credentials.username != "cook@example.com" || credentials.password != "secret" {
            return Err(AuthError::InvalidCredentials);
        }
        if !self.set_cookie {
            return Err(AuthError::SessionCookieMissing);
        }
        Ok(SessionToken::new(TOKEN))
    }
}

async fn spawn_app(authenticator: Arc<FixedAuthenticator>, importer: Importer) -> String {
    let state = Arc::new(AppState::new(authenticator, Arc::new(importer)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, rest::router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn post(base: &str, route: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}{route}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// ── Login ──

#[tokio::test]
async fn login_rejects_missing_fields_before_any_network_call() {
    let site = MockServer::start().await;
    let auth = FixedAuthenticator::new(true);
    let base = spawn_app(Arc::clone(&auth), importer_for(&site)).await;

    for body in [
        json!({}),
        json!({ "username": "cook@example.com" }),
        json!({ "username": "", "password": "secret" }),
        json!({ "username": "cook@example.com", "password": "" }),
    ] {
        let (status, resp) = post(&base, "/api/login/onetsp", body).await;
        assert_eq!(status, 400);
        assert_eq!(resp, json!({ "error": "Username and password required" }));
    }

    assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    assert!(site.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn login_without_body_is_a_validation_error() {
    let site = MockServer::start().await;
    let auth = FixedAuthenticator::new(true);
    let base = spawn_app(Arc::clone(&auth), importer_for(&site)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/login/onetsp"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_success_returns_token() {
    let site = MockServer::start().await;
    let base = spawn_app(FixedAuthenticator::new(true), importer_for(&site)).await;

    let (status, resp) = post(
        &base,
        "/api/login/onetsp",
        json!({ "username": "cook@example.com", "password": "secret" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(resp, json!({ "token": TOKEN }));
}

#[tokio::test]
async fn login_with_wrong_password() {
    let site = MockServer::start().await;
    let base = spawn_app(FixedAuthenticator::new(true), importer_for(&site)).await;

    let (status, resp) = post(
        &base,
        "/api/login/onetsp",
        json!({ "username": "cook@example.com", "password": "nope" }),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(
        resp,
        json!({ "error": "Login failed", "message": "Invalid email or password" })
    );
}

#[tokio::test]
async fn login_without_session_cookie() {
    let site = MockServer::start().await;
    let base = spawn_app(FixedAuthenticator::new(false), importer_for(&site)).await;

    let (status, resp) = post(
        &base,
        "/api/login/onetsp",
        json!({ "username": "cook@example.com", "password": "secret" }),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(
        resp,
        json!({
            "error": "Authentication failed",
            "message": "Session cookie not found after login",
        })
    );
}

// ── Import ──

#[tokio::test]
async fn import_returns_recipes() {
    let site = MockServer::start().await;
    mount_two_page_site(&site).await;
    let base = spawn_app(FixedAuthenticator::new(true), importer_for(&site)).await;

    let (status, resp) = post(&base, "/api/import/onetsp", json!({ "token": TOKEN })).await;
    assert_eq!(status, 200);
    assert_eq!(resp["recipes"].as_array().map(Vec::len), Some(3));
    assert_json_include!(
        actual: resp,
        expected: json!({
            "recipes": [{
                "url": format!("{}/recipe/1/pancakes", site.uri()),
                "title": "Pancakes",
                "ingredients": ["1 cup flour", "2 eggs"],
                "instructions": ["Mix.", "Bake."],
                "recipeUrl": "https://source.example.com/Pancakes",
                "tags": ["baking"],
                "cooktime": "40 mins",
            }]
        })
    );
}

#[tokio::test]
async fn import_requires_token() {
    let site = MockServer::start().await;
    let base = spawn_app(FixedAuthenticator::new(true), importer_for(&site)).await;

    for body in [json!({}), json!({ "token": "" })] {
        let (status, resp) = post(&base, "/api/import/onetsp", body).await;
        assert_eq!(status, 400);
        assert_eq!(resp, json!({ "error": "token required" }));
    }
    assert!(site.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn import_failure_is_500_with_description() {
    let importer = Importer::new(
        recipe_import::http_client::SiteClient::new(std::time::Duration::from_secs(2)).unwrap(),
        recipe_import::site::Site::new("http://127.0.0.1:9"),
    );
    let base = spawn_app(FixedAuthenticator::new(true), importer).await;

    let (status, resp) = post(&base, "/api/import/onetsp", json!({ "token": TOKEN })).await;
    assert_eq!(status, 500);
    let message = resp["error"].as_str().unwrap_or_default();
    assert!(message.contains("/recipes/recent/1"), "{message}");
    assert_eq!(resp.as_object().map(|o| o.len()), Some(1));
}

// ── Transport details ──

#[tokio::test]
async fn responses_declare_utf8_json() {
    let site = MockServer::start().await;
    let base = spawn_app(FixedAuthenticator::new(true), importer_for(&site)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/import/onetsp"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "application/json; charset=utf-8");
}

#[tokio::test]
async fn health_check() {
    let site = MockServer::start().await;
    let base = spawn_app(FixedAuthenticator::new(true), importer_for(&site)).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}
