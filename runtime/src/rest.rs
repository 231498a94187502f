// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP shell exposing the login and import operations.
//!
//! Thin by intent: validate the body, call the core, map the outcome to a
//! status code and JSON body. Every call is independent; nothing is kept
//! between requests.

use crate::auth::{self, Authenticator};
use crate::config::Config;
use crate::error::ApiError;
use crate::import::Importer;
use crate::protocol::{self, ImportRequest, ImportResponse, LoginRequest, LoginResponse};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Instrument};

/// Dependencies of the request handlers.
pub struct AppState {
    pub authenticator: Arc<dyn Authenticator>,
    pub importer: Arc<Importer>,
}

impl AppState {
    pub fn new(authenticator: Arc<dyn Authenticator>, importer: Arc<Importer>) -> Self {
        Self {
            authenticator,
            importer,
        }
    }

    /// Wire the configured authenticator and importer.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            auth::from_config(config),
            Arc::new(Importer::from_config(config)?),
        ))
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/login/onetsp", post(handle_login))
        .route("/api/import/onetsp", post(handle_import))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let addr = SocketAddr::new(config.http_host, config.http_port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await?;
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

/// JSON response with an explicit UTF-8 charset.
fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to serialize response: {e}"),
        )
            .into_response(),
    }
}

fn error_response(err: &ApiError) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warn!(kind = err.kind(), status = status.as_u16(), "request failed: {err}");
    json_response(status, &protocol::error_body(err))
}

fn request_span(operation: &'static str) -> tracing::Span {
    tracing::info_span!("request", operation, request_id = %uuid::Uuid::new_v4())
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Response {
    json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

async fn handle_login(
    State(state): State<Arc<AppState>>,
    body: Option<Json<LoginRequest>>,
) -> Response {
    async move {
        let request = body.map(|Json(b)| b).unwrap_or_default();
        let credentials = match request.validate() {
            Ok(c) => c,
            Err(e) => return error_response(&e.into()),
        };

        info!("starting login");
        match state.authenticator.authenticate(&credentials).await {
            Ok(token) => json_response(StatusCode::OK, &LoginResponse { token }),
            Err(e) => error_response(&e.into()),
        }
    }
    .instrument(request_span("login"))
    .await
}

async fn handle_import(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ImportRequest>>,
) -> Response {
    async move {
        let request = body.map(|Json(b)| b).unwrap_or_default();
        let token = match request.validate() {
            Ok(t) => t,
            Err(e) => return error_response(&e.into()),
        };

        info!("starting import");
        match state.importer.run(&token).await {
            Ok(recipes) => json_response(StatusCode::OK, &ImportResponse { recipes }),
            Err(e) => error_response(&e.into()),
        }
    }
    .instrument(request_span("import"))
    .await
}
