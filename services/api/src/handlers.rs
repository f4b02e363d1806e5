//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for learner
//! sessions. It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use partner_core::{
    Notice,
    engine::{Action, TransitionError, TurnEngine},
    session::SessionState,
    view::SessionView,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    audio::{self, AudioError},
    models::{
        ActionPayload, CreateSessionPayload, CredentialPayload, ErrorResponse, HealthResponse,
        SessionResponse, TranscriptionPayload, TranscriptionResponse,
    },
    state::AppState,
    store::SharedSession,
};

/// Shown while no API credential is configured.
pub const CREDENTIAL_GATE_MESSAGE: &str =
    "Please configure your OpenAI API key to start. Enter it via PUT /credential.";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    CredentialMissing,
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::CredentialMissing => (
                StatusCode::SERVICE_UNAVAILABLE,
                CREDENTIAL_GATE_MESSAGE.to_string(),
            ),
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalServerError(err)
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::UnknownScenario(_) => Self::NotFound(err.to_string()),
            _ => Self::Conflict(err.to_string()),
        }
    }
}

impl From<AudioError> for ApiError {
    fn from(err: AudioError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

async fn require_engine(state: &AppState) -> Result<Arc<TurnEngine>, ApiError> {
    state.engine().await.ok_or(ApiError::CredentialMissing)
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))
}

fn respond(id: Uuid, session: &SessionState, notices: Vec<Notice>) -> Json<SessionResponse> {
    Json(SessionResponse {
        id,
        view: SessionView::render(session),
        notices,
    })
}

/// Report liveness and whether the credential gate is open.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        credential_configured: state.engine().await.is_some(),
        active_sessions: state.sessions.len().await,
    })
}

/// Supply the API credential at runtime, unlocking the service.
#[utoipa::path(
    put,
    path = "/credential",
    request_body = CredentialPayload,
    responses(
        (status = 204, description = "Credential installed"),
        (status = 400, description = "Empty key", body = ErrorResponse)
    )
)]
pub async fn put_credential(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialPayload>,
) -> Result<StatusCode, ApiError> {
    let api_key = payload.api_key.trim();
    if api_key.is_empty() {
        return Err(ApiError::BadRequest("api_key must not be empty".to_string()));
    }
    state.install_credential(api_key).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Start a new learner session.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionPayload,
    responses(
        (status = 201, description = "Session created successfully", body = SessionResponse),
        (status = 400, description = "Missing learner name", body = ErrorResponse),
        (status = 503, description = "No API credential configured", body = ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSessionPayload>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let engine = require_engine(&state).await?;

    let mut session = SessionState::new();
    let notices = engine
        .advance(
            &mut session,
            Action::StartSession {
                name: payload.student_name,
            },
        )
        .await?;

    if session.student_name().is_none() {
        let message = notices
            .into_iter()
            .find_map(|notice| match notice {
                Notice::Warning { message } => Some(message),
                _ => None,
            })
            .unwrap_or_else(|| "student_name is required".to_string());
        return Err(ApiError::BadRequest(message));
    }

    let view = SessionView::render(&session);
    let id = state.sessions.insert(session).await;
    info!(session_id = %id, "Session created");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse { id, view, notices }),
    ))
}

/// Get the current view of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Session view", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(respond(id, &session, Vec::new()))
}

/// Apply one learner action to a session.
///
/// A reset is applied even while no credential is configured.
#[utoipa::path(
    post,
    path = "/sessions/{id}/actions",
    request_body = ActionPayload,
    responses(
        (status = 200, description = "Action applied", body = SessionResponse),
        (status = 404, description = "Session or scenario not found", body = ErrorResponse),
        (status = 409, description = "Action not valid in the current stage", body = ErrorResponse),
        (status = 503, description = "No API credential configured", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn post_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(ActionPayload(action)): Json<ActionPayload>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = find_session(&state, id).await?;
    if matches!(action, Action::Reset) {
        let mut session = shared.lock().await;
        return Ok(reset_in_place(id, &mut session));
    }

    let engine = require_engine(&state).await?;
    let mut session = shared.lock().await;

    let action_name = action.name();
    let notices = engine
        .advance(&mut session, action)
        .await
        .inspect_err(|e| {
            warn!(session_id = %id, action = action_name, error = %e, "Action rejected")
        })?;

    Ok(respond(id, &session, notices))
}

/// Transcribe a voice recording into the session's pending transcript.
#[utoipa::path(
    post,
    path = "/sessions/{id}/transcriptions",
    request_body = TranscriptionPayload,
    responses(
        (status = 200, description = "Transcription attempted", body = TranscriptionResponse),
        (status = 400, description = "Audio could not be decoded", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session is not in a conversation", body = ErrorResponse),
        (status = 503, description = "No API credential configured", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn post_transcription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TranscriptionPayload>,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let engine = require_engine(&state).await?;
    let shared = find_session(&state, id).await?;
    let recording =
        audio::prepare_recording(&payload.audio_base64, payload.format, payload.sample_rate)?;

    let mut session = shared.lock().await;
    let transcription = engine.transcribe(&mut session, recording).await?;

    Ok(Json(TranscriptionResponse {
        text: transcription.text,
        notices: transcription.notices,
    }))
}

/// Download the session log as a JSON file.
#[utoipa::path(
    get,
    path = "/sessions/{id}/export",
    responses(
        (status = 200, description = "Session log", content_type = "application/json", body = String),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn export_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;

    let body = session
        .export()
        .to_json_pretty()
        .map_err(anyhow::Error::from)?;
    let file_name = session.export_file_name(Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

/// Reset a session to its start-of-session defaults.
#[utoipa::path(
    post,
    path = "/sessions/{id}/reset",
    responses(
        (status = 200, description = "Session reset", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    Ok(reset_in_place(id, &mut session))
}

fn reset_in_place(id: Uuid, session: &mut SessionState) -> Json<SessionResponse> {
    session.reset();
    info!(session_id = %id, "Session reset");
    respond(id, session, Vec::new())
}

/// Discard a session and its log.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))?;
    info!(session_id = %id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}
