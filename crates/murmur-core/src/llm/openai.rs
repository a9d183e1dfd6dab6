use crate::constants::provider;
use crate::error::ChatError;
use crate::llm::traits::*;
use futures::channel::mpsc;
use serde::Serialize;
use serde_json::Value;

/// Client for OpenAI-compatible chat completion endpoints (DeepSeek by default).
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    params: GenerationParams,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: provider::DEFAULT_MODEL.to_string(),
            base_url: provider::DEFAULT_BASE_URL.to_string(),
            params: GenerationParams::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn completions_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            provider::CHAT_COMPLETIONS_PATH
        )
    }

    fn request_body<'a>(&'a self, messages: &'a [Message]) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: &self.model,
            messages,
            stream: true,
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

/// Outcome of decoding one SSE line.
#[derive(Debug, PartialEq)]
enum SseLine {
    Skip,
    Events(Vec<StreamEvent>),
    Finished,
}

fn decode_sse_line(line: &str) -> SseLine {
    let line = line.trim();
    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return SseLine::Finished;
    }

    let Ok(event) = serde_json::from_str::<Value>(data) else {
        tracing::debug!("Ignoring unparseable stream chunk: {data}");
        return SseLine::Skip;
    };

    let mut events = Vec::new();

    if let Some(content) = event
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str())
    {
        if !content.is_empty() {
            events.push(StreamEvent::TextDelta(content.to_string()));
        }
    }

    // Usage arrives on the final chunk, sometimes with an empty choices array.
    if let Some(usage) = event.get("usage").filter(|u| !u.is_null()) {
        let count = |field: &str| {
            usage
                .get(field)
                .and_then(|v| v.as_u64())
                .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
        };
        let input = count("prompt_tokens");
        let output = count("completion_tokens");
        if input > 0 || output > 0 {
            events.push(StreamEvent::Usage(Usage {
                input_tokens: input,
                output_tokens: output,
            }));
        }
    }

    SseLine::Events(events)
}

/// Pops complete lines off the front of `buffer`. Bytes are kept until a full
/// line is available so multi-byte characters split across network chunks
/// decode intact.
fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        lines.push(String::from_utf8_lossy(&line).into_owned());
    }
    lines
}

#[async_trait::async_trait]
impl LlmClient for OpenAIClient {
    async fn chat_stream(&self, messages: &[Message]) -> Result<CompletionStream, ChatError> {
        let url = self.completions_url();
        tracing::debug!(model = %self.model, messages = messages.len(), "Opening completion stream");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(messages))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Llm(format!(
                "Completion API error ({}): {}",
                status, text
            )));
        }

        let (tx, rx) = mpsc::unbounded();

        let mut stream = response.bytes_stream();
        let reader = tokio::spawn(async move {
            use futures::StreamExt;
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.unbounded_send(StreamEvent::Error(e.to_string()));
                        return;
                    }
                };

                if tx.is_closed() {
                    tracing::debug!("Stream receiver dropped, closing connection");
                    return;
                }

                buffer.extend_from_slice(&chunk);

                for line in drain_lines(&mut buffer) {
                    match decode_sse_line(&line) {
                        SseLine::Skip => {}
                        SseLine::Finished => {
                            let _ = tx.unbounded_send(StreamEvent::Done);
                            return;
                        }
                        SseLine::Events(events) => {
                            for event in events {
                                // Receiver dropped: the caller gave up. Returning
                                // drops `stream` and releases the connection.
                                if tx.unbounded_send(event).is_err() {
                                    tracing::debug!("Stream receiver dropped, closing connection");
                                    return;
                                }
                            }
                        }
                    }
                }
            }

            if !buffer.is_empty() {
                let tail = String::from_utf8_lossy(&buffer).into_owned();
                match decode_sse_line(&tail) {
                    SseLine::Skip => {}
                    SseLine::Finished => {
                        let _ = tx.unbounded_send(StreamEvent::Done);
                        return;
                    }
                    SseLine::Events(events) => {
                        for event in events {
                            let _ = tx.unbounded_send(event);
                        }
                    }
                }
            }

            // Only `[DONE]` marks a complete reply; a body that just stops may
            // have been cut short.
            tracing::warn!("Completion body ended without [DONE]");
            let _ = tx.unbounded_send(StreamEvent::Error(
                "stream ended without [DONE]".to_string(),
            ));
        });

        Ok(CompletionStream::new(rx).with_reader(reader))
    }
}
