//! `POST /webhook`: handshake or comment processing (completion, then reply post).

use crate::channels::{CommentPoster, PostingError};
use crate::llm::{CompletionBackend, CompletionError};
use crate::webhook::challenge::challenge_response;
use crate::webhook::event::{ChallengeReply, CommentEvent, WebhookQuery};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Duration;

/// Shared, immutable handler dependencies.
#[derive(Clone)]
pub struct WebhookState {
    pub completion: Arc<dyn CompletionBackend>,
    pub poster: Arc<dyn CommentPoster>,
    pub webhook_secret: Arc<str>,
    pub completion_timeout: Duration,
    pub posting_timeout: Duration,
    /// Listening port, reported by the health route.
    pub port: u16,
}

/// Why a comment could not be answered. Logged in full, never returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Posting(#[from] PostingError),
}

/// Generate a reply for the comment and post it on the event's target. Posting is skipped when completion fails.
pub async fn process_comment(state: &WebhookState, event: &CommentEvent) -> Result<(), ProcessError> {
    let reply = tokio::time::timeout(
        state.completion_timeout,
        state.completion.complete(&event.message.text),
    )
    .await
    .map_err(|_| CompletionError::Timeout(state.completion_timeout))??;
    log::debug!("webhook: completion ready for {} ({} chars)", event.object, reply.len());

    tokio::time::timeout(
        state.posting_timeout,
        state.poster.post_comment(&event.object, &reply),
    )
    .await
    .map_err(|_| PostingError::Timeout(state.posting_timeout))??;
    Ok(())
}

/// POST /webhook — `challengeCode` query answers the handshake; otherwise the body is a comment event.
pub async fn webhook(
    State(state): State<WebhookState>,
    query: Result<Query<WebhookQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => {
            log::warn!("webhook: malformed query string: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    if let Some(code) = query.challenge() {
        log::info!("webhook: answering challenge");
        let reply = ChallengeReply {
            challenge_code: code.to_string(),
            challenge_response: challenge_response(code, &state.webhook_secret),
        };
        return Json(reply).into_response();
    }

    let event: CommentEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("webhook: malformed comment event: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log::info!(
        "webhook: comment on {} from {}",
        event.object,
        event.actor.as_deref().unwrap_or("unknown actor")
    );

    match process_comment(&state, &event).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            log::error!("webhook: error processing comment on {}: {}", event.object, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
