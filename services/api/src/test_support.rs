//! Shared fixtures for handler and router tests.

use crate::{
    config::{Config, DEFAULT_MAX_UPLOAD_BYTES},
    state::AppState,
};
use anyhow::Result;
use async_trait::async_trait;
use axum::response::Response;
use partner_core::{
    engine::{Action, TurnEngine},
    llm_client::{LLMClient, PromptMessage},
    prompt::PromptComposer,
    session::SessionState,
    transcription::Transcriber,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

pub const PARTNER_REPLY: &str = "Yeah but homework helps you practise, right?";
pub const TRANSCRIPT: &str = "I think homework is too much";

pub struct ScriptedPartner;

#[async_trait]
impl LLMClient for ScriptedPartner {
    async fn complete(&self, _messages: Vec<PromptMessage>) -> Result<String> {
        Ok(PARTNER_REPLY.to_string())
    }
}

pub struct FixedTranscript;

#[async_trait]
impl Transcriber for FixedTranscript {
    async fn transcribe(&self, _audio: Vec<u8>) -> Result<String> {
        Ok(TRANSCRIPT.to_string())
    }
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        openai_api_key: None,
        openai_api_base: "http://localhost:9/v1".to_string(),
        chat_model: "gpt-4".to_string(),
        transcription_model: "whisper-1".to_string(),
        temperature: 0.7,
        max_tokens: 600,
        log_level: Level::INFO,
        prompts_path: "./prompts".into(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
}

pub fn gated_app_with(config: Config) -> Arc<AppState> {
    Arc::new(AppState::new(config, "persona".to_string()))
}

pub fn gated_app() -> Arc<AppState> {
    gated_app_with(test_config())
}

pub async fn open_app_with(config: Config) -> Arc<AppState> {
    let app = gated_app_with(config);
    app.install_engine(TurnEngine::new(
        Arc::new(ScriptedPartner),
        Arc::new(FixedTranscript),
        PromptComposer::default(),
    ))
    .await;
    app
}

pub async fn open_app() -> Arc<AppState> {
    open_app_with(test_config()).await
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Stores a session already chatting in the homework debate.
pub async fn debating_session(app: &Arc<AppState>) -> Uuid {
    let engine = app.engine().await.unwrap();
    let mut session = SessionState::new();
    for action in [
        Action::StartSession {
            name: "Ana".to_string(),
        },
        Action::ChooseActivity { notes: None },
        Action::Continue { notes: None },
        Action::Continue { notes: None },
        Action::Continue { notes: None },
        Action::ChooseActivity { notes: None },
        Action::SelectScenario {
            id: "homework".to_string(),
        },
    ] {
        engine.advance(&mut session, action).await.unwrap();
    }
    assert_eq!(session.state_tag(), "debate_chat");
    app.sessions.insert(session).await
}
