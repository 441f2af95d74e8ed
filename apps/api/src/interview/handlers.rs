//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::report::Report;
use crate::interview::store::{InterviewSession, SessionHandle};
use crate::interview::turn::TurnResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub resume_data: Map<String, Value>,
    pub job_description: Option<String>,
    pub company_info: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub utterance: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub result: TurnResult,
    pub turn_count: usize,
    pub interview_complete: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Starts a session at the introduction phase. No provider call.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewSession>), AppError> {
    let session_state = state.engine.start_session(
        request.resume_data,
        request.job_description,
        request.company_info,
    );
    let session = state.sessions.insert(session_state).await;
    info!("Started interview {}", session.id);

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/interviews/:id
///
/// Reads through the session lock, so a read issued while a turn is in flight waits
/// for that turn (at most the configured turn timeout) and sees its result.
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewSession>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(session.clone()))
}

/// DELETE /api/v1/interviews/:id
///
/// Removes a finished (or abandoned) interview from the store.
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;
    info!("Deleted interview {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/interviews/:id/turns
///
/// Runs one turn. Turns for the same interview queue on the session lock. A turn that
/// exceeds the configured timeout is abandoned and answered with the fallback response;
/// the session is untouched because the engine only commits on success.
pub async fn handle_advance_turn(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let utterance = request.utterance.trim();
    if utterance.is_empty() {
        return Err(AppError::Validation("utterance cannot be empty".to_string()));
    }

    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;

    let turn = tokio::time::timeout(
        state.config.turn_timeout(),
        state.engine.advance_turn(&mut session.state, utterance),
    )
    .await;

    let result = match turn {
        Ok(result) => result,
        Err(_) => {
            warn!(
                "Turn for interview {} exceeded {}s, returning fallback",
                id, state.config.turn_timeout_secs
            );
            state.engine.fallback_turn(&session.state)
        }
    };

    Ok(Json(TurnResponse {
        result,
        turn_count: session.state.turn_count(),
        interview_complete: session.state.is_closing(),
    }))
}

/// POST /api/v1/interviews/:id/report
///
/// Synthesizes the final report. Always 200: a failed synthesis returns the degraded report.
pub async fn handle_finalize_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    let report = state.engine.finalize_report(&session.state).await;
    if report.is_degraded() {
        warn!("Returning degraded report for interview {id}");
    }
    Ok(Json(report))
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
