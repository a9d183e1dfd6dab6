pub mod chat;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod llm;
pub mod relay;

// Re-export key types
pub use chat::ChatContext;
pub use config::Settings;
pub use context::{ConversationLog, HistoryEditor, HistoryStore, RequestAssembler};
pub use error::{ChatError, Result};
pub use llm::{
    CompletionStream, GenerationParams, LlmClient, Message, OpenAIClient, Role, StreamEvent, Usage,
};
pub use relay::StreamRelay;
