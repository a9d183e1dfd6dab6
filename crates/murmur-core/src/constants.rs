//! Centralized constants.
//! Defaults for the provider, the backing store and the HTTP service.

// ─── Provider ─────────────────────────────────────────────────────────────────

pub mod provider {
    pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
    pub const DEFAULT_MODEL: &str = "deepseek-chat";
    pub const DEFAULT_TEMPERATURE: f32 = 1.5;
    pub const DEFAULT_MAX_TOKENS: u32 = 5000;
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
    pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
}

// ─── Files ────────────────────────────────────────────────────────────────────

pub mod files {
    pub const HISTORY_FILE: &str = "conversation_history.json";
    pub const API_KEY_FILE: &str = "key";
    pub const CONFIG_DIR: &str = "murmur";
    pub const CONFIG_FILE: &str = "config.toml";
}

// ─── History ──────────────────────────────────────────────────────────────────

pub mod history {
    /// Number of most recent messages kept on every save.
    pub const MAX_HISTORY: usize = 100;
}

// ─── Chat ─────────────────────────────────────────────────────────────────────

pub mod chat {
    pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
}

// ─── HTTP service ─────────────────────────────────────────────────────────────

pub mod server {
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 5000;
}
