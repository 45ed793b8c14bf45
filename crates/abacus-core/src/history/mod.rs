//! Calculation history and where it is kept
//!
//! [`History`] is the in-session list the calculator appends to.
//! [`HistoryStore`] is the persistence boundary: the calculator only talks to
//! a store when its [`SessionMode`] has a storage key.

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(all(feature = "remote", not(target_arch = "wasm32")))]
mod remote;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(all(feature = "remote", not(target_arch = "wasm32")))]
pub use remote::RemoteStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Storage key used for guest sessions
pub const GUEST_KEY: &str = "guest";

/// One completed calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// e.g. `"2 + 3"` or `"sqrt(9)"`
    pub expression: String,
    /// Display form of the result
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Session history, most recent first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an entry in front of all existing ones
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// At most `n` of the most recent entries
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Swap the whole list, e.g. after loading from a store
    pub fn replace(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Who the calculator is working for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SessionMode {
    /// Nothing is persisted
    #[default]
    Anonymous,
    /// Persisted locally under [`GUEST_KEY`]
    Guest,
    /// Persisted under the account's user id
    Account { user_id: String },
}

impl SessionMode {
    /// Key the history is stored under, `None` when nothing is persisted
    pub fn storage_key(&self) -> Option<&str> {
        match self {
            SessionMode::Anonymous => None,
            SessionMode::Guest => Some(GUEST_KEY),
            SessionMode::Account { user_id } => Some(user_id),
        }
    }
}

/// History persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed history data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("history request failed: {0}")]
    Remote(String),

    #[error("history server rejected request: {0}")]
    Rejected(String),
}

/// Persistence boundary for per-user history.
///
/// Stores keep entries most recent first, the same order as [`History`].
pub trait HistoryStore {
    fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, StoreError>;

    fn append_history(&mut self, user_id: &str, entry: &HistoryEntry) -> Result<(), StoreError>;

    fn clear_history(&mut self, user_id: &str) -> Result<(), StoreError>;
}

/// Store that lives as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: HashMap<String, Vec<HistoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.users.get(user_id).cloned().unwrap_or_default())
    }

    fn append_history(&mut self, user_id: &str, entry: &HistoryEntry) -> Result<(), StoreError> {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .insert(0, entry.clone());
        Ok(())
    }

    fn clear_history(&mut self, user_id: &str) -> Result<(), StoreError> {
        self.users.remove(user_id);
        Ok(())
    }
}
