use crate::context::store::{ConversationLog, HistoryStore};
use crate::error::ChatError;

/// Position-indexed edits on the persisted log.
///
/// An out-of-range index is a silent no-op: nothing is written and the call
/// returns `Ok(false)`. Edits are not coordinated with an in-flight relay
/// cycle; the cycle's final save overwrites anything done here meanwhile.
#[derive(Debug, Clone)]
pub struct HistoryEditor {
    store: HistoryStore,
}

impl HistoryEditor {
    pub fn new(store: HistoryStore) -> Self {
        Self { store }
    }

    /// The persisted log, verbatim.
    pub fn list(&self) -> ConversationLog {
        self.store.load()
    }

    /// Replace the content of entry `index`, keeping its role.
    pub fn edit(&self, index: usize, content: impl Into<String>) -> Result<bool, ChatError> {
        let mut log = self.store.load();
        let Some(message) = log.get_mut(index) else {
            tracing::debug!(index, len = log.len(), "Edit index out of range, ignoring");
            return Ok(false);
        };

        message.content = content.into();
        self.store.save(&log)?;
        Ok(true)
    }

    /// Remove entry `index`; later entries shift down by one.
    pub fn delete(&self, index: usize) -> Result<bool, ChatError> {
        let mut log = self.store.load();
        if index >= log.len() {
            tracing::debug!(index, len = log.len(), "Delete index out of range, ignoring");
            return Ok(false);
        }

        log.remove(index);
        self.store.save(&log)?;
        Ok(true)
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<(), ChatError> {
        self.store.save(&[])
    }
}
