//! API Models
//!
//! Request and response bodies for the REST API, annotated for OpenAPI
//! generation with `utoipa`. Domain types from `partner-core` are embedded
//! as free-form objects.

use crate::audio::AudioFormat;
use partner_core::{Notice, engine::Action, view::SessionView};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionPayload {
    #[schema(example = "Ana")]
    pub student_name: String,
}

/// One learner action, tagged by `type`, e.g.
/// `{"type": "select_scenario", "id": "homework"}` or
/// `{"type": "submit_turn", "text": "Yeah but...", "method": "text"}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ActionPayload(pub Action);

/// The rendered session plus whatever the last action asked to surface.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[schema(value_type = Object)]
    pub view: SessionView,
    #[schema(value_type = Vec<Object>)]
    pub notices: Vec<Notice>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TranscriptionPayload {
    pub audio_base64: String,
    #[serde(default)]
    pub format: AudioFormat,
    /// Only used for `pcm16` uploads.
    #[schema(example = 24000)]
    pub sample_rate: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptionResponse {
    pub text: String,
    #[schema(value_type = Vec<Object>)]
    pub notices: Vec<Notice>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialPayload {
    pub api_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub credential_configured: bool,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
