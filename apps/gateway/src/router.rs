//! HTTP routes.
//!
//! `POST /chat` streams relay events as NDJSON — one JSON event per
//! line, flushed as produced. Everything the relay rejects before
//! streaming maps to a synchronous status code; once the stream has
//! started, errors arrive in-band.

use crate::state::AppState;
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use bytes::Bytes;
use futures_util::StreamExt;
use model::Backends;
use relay::{ChatRequest, RelayError, SessionGateway};
use serde::Serialize;
use std::convert::Infallible;
use store::ChatStore;

/// Build the axum router over the application state.
pub fn router<B, S, G>(state: AppState<B, S, G>) -> Router
where
    B: Backends + 'static,
    S: ChatStore + 'static,
    G: SessionGateway + 'static,
{
    Router::new()
        .route("/chat", post(chat::<B, S, G>))
        .route("/chat/{id}", delete(delete_chat::<B, S, G>))
        .route("/models", get(models::<B, S, G>))
        .route("/history", get(history::<B, S, G>))
        .with_state(state)
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Map a pre-stream relay error to its status code.
fn error_response(error: RelayError) -> Response {
    match error {
        RelayError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        RelayError::NoUserMessage => {
            (StatusCode::BAD_REQUEST, "No user message found").into_response()
        }
        RelayError::UnknownModel(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        RelayError::Provider(e) => {
            tracing::error!("provider error: {e:#}");
            (StatusCode::BAD_GATEWAY, "Upstream provider error").into_response()
        }
        RelayError::Persistence(e) => {
            tracing::error!("persistence error: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

/// `POST /chat` — run the relay and stream its events.
async fn chat<B, S, G>(
    State(state): State<AppState<B, S, G>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response
where
    B: Backends + 'static,
    S: ChatStore + 'static,
    G: SessionGateway + 'static,
{
    let session = state.sessions.resolve_session(bearer_token(&headers)).await;

    match state.relay.chat(session, request).await {
        Ok(events) => {
            let body = Body::from_stream(events.map(|event| {
                let mut line = serde_json::to_vec(&event).unwrap_or_default();
                line.push(b'\n');
                Ok::<_, Infallible>(Bytes::from(line))
            }));
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/x-ndjson")],
                body,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

/// Catalog entry returned by `GET /models`.
#[derive(Debug, Serialize)]
struct ModelCard {
    id: String,
    name: String,
    description: String,
}

/// `GET /models` — the authored model catalog.
async fn models<B, S, G>(State(state): State<AppState<B, S, G>>) -> Json<Vec<ModelCard>>
where
    B: Backends + 'static,
    S: ChatStore + 'static,
    G: SessionGateway + 'static,
{
    let cards = state
        .registry
        .list_available()
        .map(|config| ModelCard {
            id: config.id.to_string(),
            name: config.name.to_string(),
            description: config.description.clone(),
        })
        .collect();
    Json(cards)
}

/// `GET /history` — the caller's chats, newest first.
async fn history<B, S, G>(
    State(state): State<AppState<B, S, G>>,
    headers: HeaderMap,
) -> Response
where
    B: Backends + 'static,
    S: ChatStore + 'static,
    G: SessionGateway + 'static,
{
    let Some(session) = state.sessions.resolve_session(bearer_token(&headers)).await else {
        return error_response(RelayError::Unauthorized);
    };

    match state.store.chats_by_user(&session.user_id).await {
        Ok(chats) => Json(chats).into_response(),
        Err(e) => error_response(RelayError::Persistence(e)),
    }
}

/// `DELETE /chat/{id}` — ownership-checked chat deletion.
async fn delete_chat<B, S, G>(
    State(state): State<AppState<B, S, G>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    B: Backends + 'static,
    S: ChatStore + 'static,
    G: SessionGateway + 'static,
{
    let Some(session) = state.sessions.resolve_session(bearer_token(&headers)).await else {
        return error_response(RelayError::Unauthorized);
    };

    let chat = match state.store.chat_by_id(&id).await {
        Ok(Some(chat)) => chat,
        Ok(None) => return (StatusCode::NOT_FOUND, "Chat not found").into_response(),
        Err(e) => return error_response(RelayError::Persistence(e)),
    };
    if chat.user_id != session.user_id {
        return error_response(RelayError::Unauthorized);
    }

    match state.store.delete_chat(&id).await {
        Ok(()) => (StatusCode::OK, "Chat deleted").into_response(),
        Err(e) => error_response(RelayError::Persistence(e)),
    }
}
