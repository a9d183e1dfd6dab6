use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response stream ended before completion")]
    Interrupted,
}

impl ChatError {
    /// True when the failure happened while talking to the provider, as opposed
    /// to a local storage or configuration problem.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::Http(_) | Self::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
