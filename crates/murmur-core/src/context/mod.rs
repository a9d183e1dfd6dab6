mod builder;
mod editor;
mod store;

pub use builder::RequestAssembler;
pub use editor::HistoryEditor;
pub use store::{ConversationLog, HistoryStore};
