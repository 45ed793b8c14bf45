//! History persisted to a JSON file
//!
//! History lives in `history.json` under the platform data directory
//! (e.g. `~/.local/share/abacus/history.json`), keyed by user id.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{HistoryEntry, HistoryStore, StoreError};

/// Entries kept per user; older ones are dropped on append
const MAX_ENTRIES_PER_USER: usize = 100;

type HistoryFile = HashMap<String, Vec<HistoryEntry>>;

/// Store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory, `None` if there is no home
    pub fn in_data_dir() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// Default location of the history file
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "abacus").map(|dirs| dirs.data_dir().join("history.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as empty
    fn load(&self) -> Result<HistoryFile, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HistoryFile::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HistoryFile::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, data: &HistoryFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, content)?;
        tracing::trace!(path = %self.path.display(), "history saved");
        Ok(())
    }
}

impl HistoryStore for FileStore {
    fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut data = self.load()?;
        Ok(data.remove(user_id).unwrap_or_default())
    }

    fn append_history(&mut self, user_id: &str, entry: &HistoryEntry) -> Result<(), StoreError> {
        let mut data = self.load()?;
        let entries = data.entry(user_id.to_string()).or_default();
        entries.insert(0, entry.clone());
        entries.truncate(MAX_ENTRIES_PER_USER);
        self.save(&data)
    }

    fn clear_history(&mut self, user_id: &str) -> Result<(), StoreError> {
        let mut data = self.load()?;
        if data.remove(user_id).is_some() {
            self.save(&data)?;
        }
        Ok(())
    }
}
