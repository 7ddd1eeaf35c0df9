use super::state::AppState;
use crate::gateway::StopOutcome;
use crate::protocol::EMPTY_TRANSCRIPT_MESSAGE;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StopSessionRequest {
    /// Optional client-assembled transcript, overrides the accumulated one
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_id: String,
    pub status: StopOutcome,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn not_found(session_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

fn coordinator_unavailable(e: anyhow::Error) -> Response {
    error!("Session coordinator unavailable: {:#}", e);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "Session coordinator unavailable".to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /sessions/:session_id/status
/// Get status of a live session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.coordinator.session_stats(session_id.as_str()).await {
        Ok(Some(stats)) => (StatusCode::OK, Json(stats)).into_response(),
        Ok(None) => not_found(&session_id),
        Err(e) => coordinator_unavailable(e),
    }
}

/// GET /sessions/:session_id/transcript
/// Get transcript fragments accumulated so far
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.coordinator.transcript(session_id.as_str()).await {
        Ok(Some(fragments)) => (StatusCode::OK, Json(fragments)).into_response(),
        Ok(None) => not_found(&session_id),
        Err(e) => coordinator_unavailable(e),
    }
}

/// POST /sessions/:session_id/stop
/// Stop a session and broadcast its summary to the room
pub async fn stop_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Response {
    // An empty body means "no override"; anything else must parse
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        StopSessionRequest::default()
    } else {
        match serde_json::from_slice::<StopSessionRequest>(&body) {
            Ok(req) => req,
            Err(e) => {
                warn!("Rejecting stop for {} with invalid body: {}", session_id, e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Invalid stop request body: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    };
    info!("Stop requested over HTTP for session: {}", session_id);

    let outcome = match state
        .coordinator
        .stop_session(session_id.as_str(), req.transcript)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return coordinator_unavailable(e),
    };

    let (status, message) = match outcome {
        StopOutcome::Started => (StatusCode::ACCEPTED, "Generating summary"),
        StopOutcome::NothingToSummarize => (StatusCode::OK, EMPTY_TRANSCRIPT_MESSAGE),
        StopOutcome::AlreadyStopping => (StatusCode::CONFLICT, "Session is already stopping"),
        StopOutcome::UnknownSession => return not_found(&session_id),
    };

    (
        status,
        Json(StopSessionResponse {
            session_id,
            status: outcome,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
