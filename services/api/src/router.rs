//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    audio::AudioFormat,
    handlers,
    models::{
        ActionPayload, CreateSessionPayload, CredentialPayload, ErrorResponse, HealthResponse,
        SessionResponse, TranscriptionPayload, TranscriptionResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::put_credential,
        handlers::create_session,
        handlers::get_session,
        handlers::delete_session,
        handlers::post_action,
        handlers::post_transcription,
        handlers::export_session,
        handlers::reset_session,
    ),
    components(
        schemas(
            ActionPayload,
            AudioFormat,
            CreateSessionPayload,
            CredentialPayload,
            ErrorResponse,
            HealthResponse,
            SessionResponse,
            TranscriptionPayload,
            TranscriptionResponse
        )
    ),
    tags(
        (name = "Discussion Partner API", description = "Conversation practice sessions for polite disagreement")
    )
)]
pub struct ApiDoc;

/// Renders the OpenAPI document as pretty-printed JSON.
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Creates the main Axum router for the application.
///
/// Voice uploads carry base64 audio, so the transcription route accepts
/// bodies up to `Config::max_upload_bytes` instead of axum's 2 MB default.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let upload_limit = app_state.config.max_upload_bytes;

    let api_router = Router::new()
        .route("/health", get(handlers::health))
        .route("/credential", put(handlers::put_credential))
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/{id}/actions", post(handlers::post_action))
        .route(
            "/sessions/{id}/transcriptions",
            post(handlers::post_transcription).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/sessions/{id}/export", get(handlers::export_session))
        .route("/sessions/{id}/reset", post(handlers::reset_session))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        TRANSCRIPT, debating_session, json_body, open_app, open_app_with, test_config,
    };
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use base64::Engine;
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn transcription_request(id: Uuid, pcm_bytes: usize) -> Request<Body> {
        let audio = base64::engine::general_purpose::STANDARD.encode(vec![0u8; pcm_bytes]);
        let payload = json!({
            "audio_base64": audio,
            "format": "pcm16",
            "sample_rate": 44_100,
        });
        Request::builder()
            .method(Method::POST)
            .uri(format!("/sessions/{id}/transcriptions"))
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/credential",
            "/sessions",
            "/sessions/{id}",
            "/sessions/{id}/actions",
            "/sessions/{id}/transcriptions",
            "/sessions/{id}/export",
            "/sessions/{id}/reset",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }

        let session_item = &doc.paths.paths["/sessions/{id}"];
        assert!(session_item.get.is_some());
        assert!(session_item.delete.is_some());
    }

    #[test]
    fn test_openapi_json_renders_the_document() {
        let json: serde_json::Value = serde_json::from_str(&openapi_json().unwrap()).unwrap();
        assert!(json["paths"]["/sessions/{id}/actions"]["post"].is_object());
        assert!(json["components"]["schemas"]["TranscriptionPayload"].is_object());
    }

    #[tokio::test]
    async fn test_transcription_accepts_recordings_over_two_megabytes() {
        let app = open_app().await;
        let id = debating_session(&app).await;

        // about 36 s of 44.1 kHz mono PCM16, roughly 4 MiB once base64 encoded
        let request = transcription_request(id, 3 * 1024 * 1024);
        let response = create_router(app.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["text"], TRANSCRIPT);
    }

    #[tokio::test]
    async fn test_transcription_rejects_bodies_over_the_configured_cap() {
        let mut config = test_config();
        config.max_upload_bytes = 1024;
        let app = open_app_with(config).await;
        let id = debating_session(&app).await;

        let response = create_router(app.clone())
            .oneshot(transcription_request(id, 4096))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let session = app.sessions.get(id).await.unwrap();
        assert_eq!(session.lock().await.pending_transcript(), None);
    }

    #[tokio::test]
    async fn test_delete_route_removes_the_session() {
        let app = open_app().await;
        let id = debating_session(&app).await;
        let router = create_router(app.clone());

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(app.sessions.is_empty().await);

        let request = Request::builder()
            .uri(format!("/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
