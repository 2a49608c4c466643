use crate::fields::{build_fields, client_address};
use crate::notifications::{Embed, WebhookMessage};
use crate::payload::InboundPayload;
use crate::traits::NotificationSender;
use axum::body::{self, Body};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::{debug, error, info, warn, Level};
use uuid::Uuid;

pub const COLLECT_PATH: &str = "/api/collect";

/// Bodies larger than this are treated as empty.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub webhook_url: Option<String>,
    pub sender: Arc<dyn NotificationSender>,
}

impl AppState {
    pub fn new(webhook_url: Option<String>, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            webhook_url: webhook_url.filter(|url| !url.is_empty()),
            sender,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Missing DISCORD_WEBHOOK_URL")]
    MissingWebhook,

    #[error("Discord error: {0}")]
    Rejected(String),

    #[error("Server error")]
    Transport(#[source] anyhow::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::Transport(e) => error!("Failed to deliver notification: {:#}", e),
            RelayError::Rejected(body) => debug!("Webhook rejected notification: {}", body),
            RelayError::MissingWebhook => debug!("No webhook configured, dropping notification"),
            RelayError::MethodNotAllowed => (),
        }

        (self.status(), self.to_string()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", routing::get(|| async { "up" }))
        .route(COLLECT_PATH, routing::any(collect))
        .with_state(state)
        .layer(
            // 500s are already reported by the handler, at most once.
            TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
        )
}

// - POST /api/collect
#[tracing::instrument(
    name = "Collect",
    skip(state, request),
    fields(
        request_id = %Uuid::new_v4(),
        method = %request.method(),
    )
)]
pub async fn collect(State(state): State<AppState>, request: Request) -> Response {
    match relay(&state, request).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn relay(state: &AppState, request: Request) -> Result<(), RelayError> {
    if request.method() != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let endpoint = state.webhook_url.as_deref().ok_or(RelayError::MissingWebhook)?;

    let (parts, body) = request.into_parts();
    let payload = read_payload(body).await;
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = client_address(&parts.headers, peer);

    let fields = build_fields(&payload, &client);
    info!("Relaying {} fields for client {}", fields.len(), &client);

    let message = WebhookMessage::from_embed(Embed::visitor(fields));
    let delivery = state
        .sender
        .send(&message, endpoint)
        .await
        .map_err(RelayError::Transport)?;

    if delivery.is_success() {
        info!("Notification delivered with status {}", delivery.status);
        Ok(())
    } else {
        Err(RelayError::Rejected(delivery.body))
    }
}

async fn read_payload(body: Body) -> InboundPayload {
    match body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => InboundPayload::from_body(&bytes),
        Err(e) => {
            warn!("Failed to read request body, using an empty payload: {:?}", e);
            InboundPayload::default()
        }
    }
}
