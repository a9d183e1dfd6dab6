use crate::llm::Message;

/// Builds the exact message list sent to the provider:
/// system directive, then the stored log, then the new user turn.
#[derive(Debug, Clone)]
pub struct RequestAssembler {
    system_directive: String,
}

impl RequestAssembler {
    pub fn new(system_directive: impl Into<String>) -> Self {
        Self {
            system_directive: system_directive.into(),
        }
    }

    /// `log` is only read. The new user turn is not persisted here.
    pub fn build(&self, log: &[Message], user_text: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(log.len() + 2);
        messages.push(Message::system(self.system_directive.as_str()));
        messages.extend(log.iter().cloned());
        messages.push(Message::user(user_text));
        messages
    }
}

impl Default for RequestAssembler {
    fn default() -> Self {
        Self::new(crate::constants::chat::DEFAULT_SYSTEM_PROMPT)
    }
}
