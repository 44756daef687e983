use super::state::AppState;
use crate::error::StartError;
use crate::events::{FailureNotice, TranscriptFragment};
use crate::session::SessionStats;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::{error, info};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_id: String,
    pub status: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub fragments: Vec<TranscriptFragment>,
    pub last_failure: Option<FailureNotice>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
/// Begin a streaming run (supersedes a run already listening)
pub async fn start_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.session.config().session_id.clone();
    info!("HTTP start requested for session: {}", session_id);

    match state.session.start().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StartSessionResponse {
                session_id,
                status: "listening".to_string(),
                message: "Transcription started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start session: {}", e);
            let status = match e {
                StartError::PermissionDenied => StatusCode::FORBIDDEN,
                StartError::CapabilityUnavailable => StatusCode::NOT_IMPLEMENTED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /session/stop
/// End the streaming run (no-op if idle)
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.session.config().session_id.clone();
    info!("HTTP stop requested for session: {}", session_id);

    state.session.stop();

    (
        StatusCode::OK,
        Json(StopSessionResponse {
            session_id,
            status: "stopped".to_string(),
            stats: state.session.stats(),
        }),
    )
}

/// GET /session/status
/// Current state and lifetime counters
pub async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.stats()))
}

/// GET /session/transcript
/// Fragments collected since startup, plus the last failure if any
pub async fn session_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let fragments = state.transcript.read().await.clone();
    let last_failure = state.last_failure.read().await.clone();

    (
        StatusCode::OK,
        Json(TranscriptResponse {
            fragments,
            last_failure,
        }),
    )
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
