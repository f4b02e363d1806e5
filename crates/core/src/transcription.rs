//! Speech-to-text collaborator used for optional voice input.

use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{AudioInput, CreateTranscriptionRequestArgs},
};
use async_trait::async_trait;
use tracing::debug;

/// File name attached to uploaded recordings.
pub const RECORDING_FILE_NAME: &str = "recording.wav";

/// Turns a recorded utterance into text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes WAV-encoded audio bytes.
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String>;
}

/// A `Transcriber` backed by an OpenAI-compatible transcription endpoint.
pub struct WhisperTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String> {
        debug!(bytes = audio.len(), model = %self.model, "Sending transcription request");
        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(RECORDING_FILE_NAME.to_string(), audio))
            .model(&self.model)
            .build()
            .context("Failed to build transcription request")?;

        let response = self.client.audio().transcribe(request).await?;
        Ok(response.text.trim().to_string())
    }
}
