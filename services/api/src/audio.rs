//! Voice upload handling: base64 decoding, WAV validation, and wrapping raw
//! PCM16 capture in a WAV container for the transcriber.

use base64::Engine;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::Deserialize;
use std::io::Cursor;
use utoipa::ToSchema;

/// Sample rate assumed for raw PCM16 uploads that do not state one.
pub const DEFAULT_PCM16_SAMPLE_RATE: u32 = 24_000;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("audio payload is empty")]
    Empty,
    #[error("audio is not a readable WAV file: {0}")]
    NotWav(#[source] hound::Error),
    #[error("failed to encode WAV audio: {0}")]
    Encode(#[source] hound::Error),
    #[error("PCM16 audio must contain an even number of bytes, got {0}")]
    OddPcmLength(usize),
    #[error("sample rate must be positive")]
    InvalidSampleRate,
}

/// Encoding of an uploaded recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// A complete WAV file, as produced by a browser recorder.
    #[default]
    Wav,
    /// Headerless little-endian 16-bit mono samples.
    Pcm16,
}

pub fn decode_base64(fragment: &str) -> Result<Vec<u8>, AudioError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(fragment.trim())?;
    if bytes.is_empty() {
        return Err(AudioError::Empty);
    }
    Ok(bytes)
}

/// Parses the WAV header of `bytes` and returns its format.
pub fn wav_spec(bytes: &[u8]) -> Result<WavSpec, AudioError> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(AudioError::NotWav)?;
    Ok(reader.spec())
}

/// Wraps little-endian PCM16 mono samples in a WAV container.
pub fn pcm16_to_wav(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    if pcm.len() % 2 != 0 {
        return Err(AudioError::OddPcmLength(pcm.len()));
    }
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate);
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    let mut writer = WavWriter::new(&mut cursor, spec).map_err(AudioError::Encode)?;
    for chunk in pcm.chunks_exact(2) {
        writer
            .write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))
            .map_err(AudioError::Encode)?;
    }
    writer.finalize().map_err(AudioError::Encode)?;
    Ok(cursor.into_inner())
}

/// Turns an uploaded recording into WAV bytes ready for transcription.
pub fn prepare_recording(
    audio_base64: &str,
    format: AudioFormat,
    sample_rate: Option<u32>,
) -> Result<Vec<u8>, AudioError> {
    let bytes = decode_base64(audio_base64)?;
    match format {
        AudioFormat::Wav => {
            wav_spec(&bytes)?;
            Ok(bytes)
        }
        AudioFormat::Pcm16 => {
            pcm16_to_wav(&bytes, sample_rate.unwrap_or(DEFAULT_PCM16_SAMPLE_RATE))
        }
    }
}
