//! Bounded per-conversation history.
//!
//! Owned by whatever layer manages conversation identity; the engine
//! itself is stateless across chat turns.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::SearchResult;

/// Default number of history entries retained per conversation.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// A source cited in a chat answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAttribution {
    /// Origin identifier of the cited chunk.
    pub source: String,
    /// Similarity score of the cited chunk for the query.
    pub similarity: f32,
    /// Page title, for Wikipedia-sourced chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl From<&SearchResult> for SourceAttribution {
    fn from(result: &SearchResult) -> Self {
        Self {
            source: result.chunk.source().to_string(),
            similarity: result.similarity,
            title: result.chunk.title().map(str::to_string),
        }
    }
}

/// One chat turn: the query, the answer, and the sources it cited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The user query.
    pub query: String,
    /// The answer text.
    pub response: String,
    /// Sources cited in the answer, in retrieval order.
    pub sources: Vec<SourceAttribution>,
    /// When the turn completed.
    pub timestamp: DateTime<Utc>,
}

/// A bounded FIFO queue of chat turns.
///
/// Holds at most `capacity` entries (default 10); recording a new entry
/// when full evicts the oldest first.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl ConversationHistory {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Record a chat turn, evicting the oldest entry if at capacity.
    pub fn record(
        &mut self,
        query: impl Into<String>,
        response: impl Into<String>,
        sources: Vec<SourceAttribution>,
    ) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            query: query.into(),
            response: response.into(),
            sources,
            timestamp: Utc::now(),
        });
    }

    /// The retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
