use crate::config::Settings;
use crate::context::{HistoryEditor, HistoryStore, RequestAssembler};
use crate::error::ChatError;
use crate::llm::LlmClient;
use crate::relay::StreamRelay;
use std::sync::Arc;

/// Everything a surface needs to run conversation cycles: the backing store,
/// the system directive and the provider client. Built once at startup and
/// passed down.
#[derive(Clone)]
pub struct ChatContext {
    store: HistoryStore,
    assembler: RequestAssembler,
    llm: Arc<dyn LlmClient>,
}

impl ChatContext {
    pub fn new(store: HistoryStore, assembler: RequestAssembler, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            store,
            assembler,
            llm,
        }
    }

    /// Build from settings. Fails if the API key cannot be read.
    pub fn from_settings(settings: &Settings) -> Result<Self, ChatError> {
        let llm = settings.build_llm_client()?;
        Ok(Self::new(
            settings.history_store(),
            RequestAssembler::new(settings.chat.system_prompt.clone()),
            Arc::from(llm),
        ))
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn relay(&self) -> StreamRelay {
        StreamRelay::new(self.store.clone(), self.assembler.clone(), Arc::clone(&self.llm))
    }

    pub fn editor(&self) -> HistoryEditor {
        HistoryEditor::new(self.store.clone())
    }
}
