use crate::constants::history::MAX_HISTORY;
use crate::error::ChatError;
use crate::llm::Message;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The persisted conversation, oldest message first.
pub type ConversationLog = Vec<Message>;

/// File-backed conversation log.
///
/// Nothing is cached: every `load` reads the file and every `save` rewrites it
/// whole, so the file is the single source of truth. There is no lock around
/// a load/save pair; two concurrent read-modify-write cycles race and the last
/// save wins. That is acceptable for a single-user tool.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_history: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_history: MAX_HISTORY,
        }
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Read the log. A missing file is an empty log; so is a file that cannot
    /// be read or parsed, which is logged and otherwise ignored.
    pub fn load(&self) -> ConversationLog {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read history file: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "History file is corrupt, starting from an empty log: {e}"
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the file with the most recent `max_history` entries of `log`.
    ///
    /// Each save writes its own uniquely named temp file next to the target
    /// and renames it into place, so a reader sees either the previous content
    /// or the new content, never a mix, even with several saves in flight.
    pub fn save(&self, log: &[Message]) -> Result<(), ChatError> {
        let start = log.len().saturating_sub(self.max_history);
        let retained = &log[start..];

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let contents = serde_json::to_string_pretty(retained)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(
            path = %self.path.display(),
            entries = retained.len(),
            dropped = start,
            "Saved conversation history"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("conversation_history.json"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_half_written_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"[{"role": "user", "content": "hel"#).unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_unicode_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let log = vec![
            Message::user("你好，世界"),
            Message::assistant("Привет 👋 — «ok» \u{0}\n\ttabs"),
            Message::user("مرحبا"),
        ];

        store.save(&log).unwrap();
        assert_eq!(store.load(), log);
    }

    #[test]
    fn test_file_is_pretty_utf8_without_escapes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[Message::user("你好")]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("你好"));
        assert!(raw.contains("\n  {"));
        assert!(raw.contains(r#""role": "user""#));
    }

    #[test]
    fn test_save_truncates_to_most_recent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).with_max_history(3);
        let log: Vec<Message> = (0..5).map(|i| Message::user(format!("m{i}"))).collect();

        store.save(&log).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded, log[2..].to_vec());
    }

    #[test]
    fn test_default_cap_is_one_hundred() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let log: Vec<Message> = (0..105).map(|i| Message::assistant(i.to_string())).collect();

        store.save(&log).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.len(), 100);
        assert_eq!(loaded.first().unwrap().content, "5");
        assert_eq!(loaded.last().unwrap().content, "104");
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[Message::user("a"), Message::assistant("b")]).unwrap();
        store.save(&[Message::user("c")]).unwrap();

        assert_eq!(store.load(), vec![Message::user("c")]);
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_concurrent_saves_never_expose_partial_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[Message::user("seed")]).unwrap();

        let writers: Vec<_> = (0..8)
            .map(|w| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let filler = "x".repeat(2_000);
                    for round in 0..20 {
                        let log: Vec<Message> = (0..100)
                            .map(|i| Message::user(format!("{w}-{round}-{i}-{filler}")))
                            .collect();
                        store.save(&log).unwrap();
                    }
                })
            })
            .collect();

        let reader = {
            let path = store.path().to_path_buf();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let raw = fs::read_to_string(&path).unwrap();
                    serde_json::from_str::<Vec<Message>>(&raw)
                        .expect("reader saw a partially written history file");
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        assert_eq!(store.load().len(), 100);
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = HistoryStore::new(blocker.join("history.json"));

        let err = store.save(&[Message::user("hi")]).unwrap_err();
        assert!(matches!(err, ChatError::Io(_)));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("nested/deeper/history.json"));
        store.save(&[Message::user("hi")]).unwrap();

        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"[{"role":"user","content":"a"},{"role":"assistant","content":"b"}]"#,
        )
        .unwrap();

        let log = store.load();
        assert_eq!(log[0].role, Role::User);
        assert_eq!(log[1].role, Role::Assistant);
    }
}
