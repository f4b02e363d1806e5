use partner_core::llm_client::ChatSettings;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// The API key is optional: without it the service starts parked at the
/// credential gate until one is supplied through `PUT /credential`.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub log_level: Level,
    pub prompts_path: PathBuf,
    /// Largest request body accepted by the voice upload route, in bytes.
    pub max_upload_bytes: usize,
}

/// Fits about three minutes of base64 44.1 kHz stereo PCM16 audio.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 40 * 1024 * 1024;

fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address: SocketAddr = parse_var("BIND_ADDRESS", "0.0.0.0:3000")?;

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let openai_api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let transcription_model =
            std::env::var("TRANSCRIPTION_MODEL").unwrap_or_else(|_| "whisper-1".to_string());

        let temperature: f32 = parse_var("TEMPERATURE", "0.7")?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue(
                "TEMPERATURE".to_string(),
                format!("{temperature} is outside 0.0..=2.0"),
            ));
        }
        let max_tokens: u32 = parse_var("MAX_TOKENS", "600")?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./prompts"));

        let max_upload_bytes: usize =
            parse_var("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_UPLOAD_BYTES".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            openai_api_key,
            openai_api_base,
            chat_model,
            transcription_model,
            temperature,
            max_tokens,
            log_level,
            prompts_path,
            max_upload_bytes,
        })
    }

    /// Completion parameters handed to the partner model client.
    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            model: self.chat_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("OPENAI_API_KEY");
            env::remove_var("OPENAI_API_BASE");
            env::remove_var("CHAT_MODEL");
            env::remove_var("TRANSCRIPTION_MODEL");
            env::remove_var("TEMPERATURE");
            env::remove_var("MAX_TOKENS");
            env::remove_var("RUST_LOG");
            env::remove_var("PROMPTS_PATH");
            env::remove_var("MAX_UPLOAD_BYTES");
        }
    }

    #[test]
    fn test_config_error_display() {
        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_defaults_without_credential() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load without a key");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_api_base, "https://api.openai.com/v1");
        assert_eq!(config.chat_model, "gpt-4");
        assert_eq!(config.transcription_model, "whisper-1");
        assert_relative_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 600);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.prompts_path, PathBuf::from("./prompts"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("OPENAI_API_KEY", "custom-openai-key");
            env::set_var("OPENAI_API_BASE", "http://localhost:11434/v1");
            env::set_var("CHAT_MODEL", "gpt-4o-mini");
            env::set_var("TRANSCRIPTION_MODEL", "whisper-large");
            env::set_var("TEMPERATURE", "0.2");
            env::set_var("MAX_TOKENS", "256");
            env::set_var("RUST_LOG", "debug");
            env::set_var("PROMPTS_PATH", "/custom/prompts");
            env::set_var("MAX_UPLOAD_BYTES", "1048576");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.openai_api_key, Some("custom-openai-key".to_string()));
        assert_eq!(config.openai_api_base, "http://localhost:11434/v1");
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.transcription_model, "whisper-large");
        assert_relative_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.prompts_path, PathBuf::from("/custom/prompts"));
        assert_eq!(config.max_upload_bytes, 1_048_576);

        let settings = config.chat_settings();
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_tokens, 256);
    }

    #[test]
    #[serial]
    fn test_blank_api_key_counts_as_missing() {
        clear_env_vars();
        unsafe {
            env::set_var("OPENAI_API_KEY", "   ");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert_eq!(config.openai_api_key, None);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_temperature() {
        clear_env_vars();
        unsafe {
            env::set_var("TEMPERATURE", "hot");
        }
        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "TEMPERATURE"),
        }

        unsafe {
            env::set_var("TEMPERATURE", "3.5");
        }
        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, reason) => {
                assert_eq!(var, "TEMPERATURE");
                assert!(reason.contains("outside"));
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_max_tokens() {
        clear_env_vars();
        unsafe {
            env::set_var("MAX_TOKENS", "-5");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "MAX_TOKENS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_upload_limit() {
        clear_env_vars();
        unsafe {
            env::set_var("MAX_UPLOAD_BYTES", "0");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "MAX_UPLOAD_BYTES"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
        }
    }
}
