//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the session store,
//! the credential-gated turn engine and the loaded configuration.

use crate::config::Config;
use async_openai::config::OpenAIConfig;
use partner_core::{
    engine::TurnEngine,
    llm_client::OpenAICompatibleClient,
    prompt::PromptComposer,
    transcription::WhisperTranscriber,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::store::SessionStore;

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub sessions: SessionStore,
    /// `None` until an API key has been supplied; every session-advancing
    /// route is parked behind it.
    pub engine: RwLock<Option<Arc<TurnEngine>>>,
    pub system_prompt: Arc<String>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates the state, building the engine right away when the
    /// configuration already carries a key.
    pub fn new(config: Config, system_prompt: String) -> Self {
        let system_prompt = Arc::new(system_prompt);
        let engine = config
            .openai_api_key
            .as_deref()
            .map(|key| Arc::new(build_engine(&config, key, &system_prompt)));
        Self {
            sessions: SessionStore::new(),
            engine: RwLock::new(engine),
            system_prompt,
            config: Arc::new(config),
        }
    }

    /// Installs a ready engine, replacing any previous one.
    pub async fn install_engine(&self, engine: TurnEngine) {
        *self.engine.write().await = Some(Arc::new(engine));
    }

    /// Rebuilds the collaborators around a newly entered key.
    pub async fn install_credential(&self, api_key: &str) {
        let engine = build_engine(&self.config, api_key, &self.system_prompt);
        self.install_engine(engine).await;
        info!("API credential installed; sessions are unlocked.");
    }

    pub async fn engine(&self) -> Option<Arc<TurnEngine>> {
        self.engine.read().await.clone()
    }
}

/// Wires the OpenAI-compatible collaborators into a `TurnEngine`.
pub fn build_engine(config: &Config, api_key: &str, system_prompt: &str) -> TurnEngine {
    let openai_config = OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(&config.openai_api_base);
    TurnEngine::new(
        Arc::new(OpenAICompatibleClient::new(
            openai_config.clone(),
            config.chat_settings(),
        )),
        Arc::new(WhisperTranscriber::new(
            openai_config,
            config.transcription_model.clone(),
        )),
        PromptComposer::new(system_prompt),
    )
}
