use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{chat, files, history, provider, server};
use crate::context::HistoryStore;
use crate::error::ChatError;
use crate::llm::{GenerationParams, LlmClient, OpenAIClient};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub history: HistorySettings,
    pub chat: ChatSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key_file: PathBuf,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    pub path: PathBuf,
    pub max_history: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatSettings {
    pub system_prompt: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: provider::DEFAULT_BASE_URL.to_string(),
            model: provider::DEFAULT_MODEL.to_string(),
            temperature: provider::DEFAULT_TEMPERATURE,
            max_tokens: provider::DEFAULT_MAX_TOKENS,
            api_key_file: PathBuf::from(files::API_KEY_FILE),
            connect_timeout_secs: provider::DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(files::HISTORY_FILE),
            max_history: history::MAX_HISTORY,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_prompt: chat::DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: server::DEFAULT_HOST.to_string(),
            port: server::DEFAULT_PORT,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(files::CONFIG_DIR)
            .join(files::CONFIG_FILE)
    }

    /// Load from the default config location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`. A missing file yields defaults; an unreadable or
    /// invalid file yields defaults and a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Invalid config, using defaults: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to read config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Read the API key from the configured key file.
    pub fn api_key(&self) -> Result<String, ChatError> {
        let path = &self.llm.api_key_file;
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!(
                "Failed to read API key file {}: {}",
                path.display(),
                e
            ))
        })?;
        let key = raw.trim();
        if key.is_empty() {
            return Err(ChatError::Config(format!(
                "API key file {} is empty",
                path.display()
            )));
        }
        Ok(key.to_string())
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
        }
    }

    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::new(&self.history.path).with_max_history(self.history.max_history)
    }

    /// Build the completion client. Reads the API key, so this is where a
    /// missing key surfaces at startup.
    pub fn build_llm_client(&self) -> Result<Box<dyn LlmClient>, ChatError> {
        let api_key = self.api_key()?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.llm.connect_timeout_secs))
            .build()?;

        Ok(Box::new(
            OpenAIClient::new(api_key)
                .with_http_client(http)
                .with_base_url(&self.llm.base_url)
                .with_model(&self.llm.model)
                .with_params(self.generation_params()),
        ))
    }
}
