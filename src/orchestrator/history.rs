//! Conversation History
//!
//! Append-only in-memory dialogue log, orthogonal to task execution. No
//! pipeline component reads it; it exists so a caller can track external
//! conversation state alongside the orchestrator. Unbounded and lost on
//! process exit by design.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged dialogue entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered conversation log, mutable only through append and clear
#[derive(Debug, Default)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a timestamped entry
    pub fn append(&mut self, role: impl Into<String>, content: impl Into<String>) {
        self.entries.push(HistoryEntry {
            role: role.into(),
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// Full ordered sequence. Borrowed view only; internal storage cannot
    /// be mutated through it.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Empty the log
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
