//! HTTP request handlers
//!
//! Implements the session and resolution endpoints. Playback errors are
//! absorbed by the session state machine; the only error statuses this
//! layer produces are 404 for unknown sessions and 400 for malformed
//! requests.

use crate::api::AppState;
use crate::error::Error;
use crate::player::session::{Directive, MediaEvent, SessionSnapshot};
use crate::resolver::{Candidate, ReferenceKind};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    port: u16,
    sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    reference: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    session: SessionSnapshot,
    directive: Directive,
}

#[derive(Debug, Serialize)]
pub struct DirectiveResponse {
    directive: Directive,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    position_ms: u64,
    #[serde(default)]
    duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceReferenceRequest {
    reference: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    reference: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    reference: String,
    kind: String,
    /// `None` when the reference is rejected for playback
    candidates: Option<Vec<Candidate>>,
    iframe_url: Option<String>,
    /// Rejection reason when no candidates could be built
    rejection: Option<String>,
}

type HandlerError = (StatusCode, Json<StatusResponse>);

fn not_found(e: Error) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(StatusResponse {
            status: e.to_string(),
        }),
    )
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "video_player".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        port: state.port,
        sessions: state.engine.session_count().await,
    })
}

// ============================================================================
// Stateless Resolution
// ============================================================================

/// GET /resolve?reference= - Classify and resolve without a session
///
/// Always answers 200: rejected references report their classification
/// and rejection reason so server-side rendering can show the right
/// terminal message.
pub async fn resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Json<ResolveResponse> {
    let resolver = state.engine.resolver();
    let kind = match resolver.classify(&params.reference) {
        ReferenceKind::Identifier(_) => "identifier",
        ReferenceKind::StreamingUrl(_) => "streaming_url",
        ReferenceKind::StorageUrl => "storage_url",
        ReferenceKind::Invalid => "invalid",
    };

    let (candidates, rejection) = match resolver.build_candidates(&params.reference) {
        Ok(candidates) => (Some(candidates), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Json(ResolveResponse {
        reference: params.reference.clone(),
        kind: kind.to_string(),
        candidates,
        iframe_url: resolver.derive_iframe_url(&params.reference),
        rejection,
    })
}

// ============================================================================
// Session Lifecycle
// ============================================================================

/// POST /sessions - Create a playback session
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Json<SessionResponse> {
    info!("Create session request for reference: {}", request.reference);
    let (session, directive) = state.engine.create_session(&request.reference).await;
    Json(SessionResponse { session, directive })
}

/// GET /sessions/:id - Session snapshot
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, HandlerError> {
    let snapshot = state.engine.snapshot(session_id).await.map_err(not_found)?;
    Ok(Json(snapshot))
}

/// DELETE /sessions/:id - Remove a session, releasing its stream client
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<StatusResponse>, HandlerError> {
    state
        .engine
        .remove_session(session_id)
        .await
        .map_err(not_found)?;
    Ok(Json(StatusResponse {
        status: "removed".to_string(),
    }))
}

// ============================================================================
// Player-Reported Events
// ============================================================================

/// POST /sessions/:id/events - Feed a media event into the state machine
pub async fn media_event(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(event): Json<MediaEvent>,
) -> Result<Json<DirectiveResponse>, HandlerError> {
    let directive = state
        .engine
        .media_event(session_id, event)
        .await
        .map_err(not_found)?;
    Ok(Json(DirectiveResponse { directive }))
}

/// POST /sessions/:id/progress - Record playback progress
pub async fn progress(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<StatusResponse>, HandlerError> {
    state
        .engine
        .update_progress(session_id, request.position_ms, request.duration_ms)
        .await
        .map_err(not_found)?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

/// POST /sessions/:id/reference - Replace the session's video reference
pub async fn replace_reference(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ReplaceReferenceRequest>,
) -> Result<Json<SessionResponse>, HandlerError> {
    let (session, directive) = state
        .engine
        .replace_reference(session_id, &request.reference)
        .await
        .map_err(not_found)?;
    Ok(Json(SessionResponse { session, directive }))
}
