use crate::context::{HistoryStore, RequestAssembler};
use crate::error::ChatError;
use crate::llm::{LlmClient, Message, StreamEvent};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;

/// Runs one request/response cycle against the provider and keeps the
/// persisted log consistent with what the caller actually received.
#[derive(Clone)]
pub struct StreamRelay {
    store: HistoryStore,
    assembler: RequestAssembler,
    llm: Arc<dyn LlmClient>,
}

impl StreamRelay {
    pub fn new(store: HistoryStore, assembler: RequestAssembler, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            store,
            assembler,
            llm,
        }
    }

    /// Stream the reply to `user_text` fragment by fragment.
    ///
    /// The returned stream is lazy and single pass. Once the provider finishes
    /// normally, the user turn and the full assistant reply are appended to the
    /// log as it was read at the start of the cycle and saved. If the provider
    /// fails, or the stream is dropped before it finishes, nothing is saved.
    /// Any failure is the last item of the stream.
    pub fn respond(&self, user_text: impl Into<String>) -> BoxStream<'static, Result<String, ChatError>> {
        let store = self.store.clone();
        let assembler = self.assembler.clone();
        let llm = Arc::clone(&self.llm);
        let user_text = user_text.into();

        Box::pin(async_stream::stream! {
            let mut log = store.load();
            let request = assembler.build(&log, &user_text);

            let mut events = match llm.chat_stream(&request).await {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!("Failed to open completion stream: {e}");
                    yield Err(e);
                    return;
                }
            };

            let mut reply = String::new();
            loop {
                match events.next().await {
                    Some(StreamEvent::TextDelta(fragment)) => {
                        reply.push_str(&fragment);
                        yield Ok(fragment);
                    }
                    Some(StreamEvent::Usage(usage)) => {
                        tracing::debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "Completion usage"
                        );
                    }
                    Some(StreamEvent::Done) => break,
                    Some(StreamEvent::Error(err)) => {
                        tracing::warn!(received = reply.len(), "Completion stream failed: {err}");
                        yield Err(ChatError::Llm(err));
                        return;
                    }
                    None => {
                        tracing::warn!(received = reply.len(), "Completion stream closed without finishing");
                        yield Err(ChatError::Interrupted);
                        return;
                    }
                }
            }

            log.push(Message::user(user_text));
            log.push(Message::assistant(reply));
            if let Err(e) = store.save(&log) {
                tracing::error!("Failed to persist conversation: {e}");
                yield Err(e);
            }
        })
    }
}
