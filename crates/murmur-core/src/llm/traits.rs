use crate::error::ChatError;
use futures::channel::mpsc::UnboundedReceiver;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of a conversation. Its identity is its position in the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Events emitted during a streaming completion.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    TextDelta(String),
    Usage(Usage),
    Done,
    Error(String),
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: crate::constants::provider::DEFAULT_TEMPERATURE,
            max_tokens: crate::constants::provider::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Receiving end of one completion.
///
/// Dropping it cancels the completion: the task reading the provider
/// response, if any, is aborted and its connection closed straight away,
/// even while the provider is sending nothing.
#[derive(Debug)]
pub struct CompletionStream {
    events: UnboundedReceiver<StreamEvent>,
    reader: Option<JoinHandle<()>>,
}

impl CompletionStream {
    pub fn new(events: UnboundedReceiver<StreamEvent>) -> Self {
        Self {
            events,
            reader: None,
        }
    }

    /// Tie the lifetime of `reader` to this stream.
    pub fn with_reader(mut self, reader: JoinHandle<()>) -> Self {
        self.reader = Some(reader);
        self
    }
}

impl From<UnboundedReceiver<StreamEvent>> for CompletionStream {
    fn from(events: UnboundedReceiver<StreamEvent>) -> Self {
        Self::new(events)
    }
}

impl Stream for CompletionStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<StreamEvent>> {
        self.events.poll_next_unpin(cx)
    }
}

impl Drop for CompletionStream {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            if !reader.is_finished() {
                tracing::debug!("Completion dropped before the provider finished, closing connection");
            }
            reader.abort();
        }
    }
}

/// The completion provider. Given an ordered list of role-tagged messages it
/// returns a finite stream of events that ends with `Done` or `Error`.
///
/// Dropping the returned stream is how callers cancel.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_stream(&self, messages: &[Message]) -> Result<CompletionStream, ChatError>;
}
