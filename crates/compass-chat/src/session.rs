//! Per-visitor conversation state.
//!
//! A session owns an append-only transcript and the suggestions currently
//! offered to the user. Transitions are driven by [`crate::Assistant`];
//! this module only guards the invariants of the data itself.

use chrono::{DateTime, Utc};
use compass_core::knowledge::ALL_CATEGORIES;
use compass_core::{KnowledgeEntry, Turn};
use serde::Serialize;
use uuid::Uuid;

/// Where a session is in the disambiguation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No suggestions pending.
    Idle,
    /// The user was offered suggestions and may pick one.
    AwaitingChoice,
}

/// Ephemeral conversation state for one visitor.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    transcript: Vec<Turn>,
    pending_suggestions: Vec<KnowledgeEntry>,
    active_category: String,
}

impl Session {
    /// A fresh session filtered to `active_category`.
    pub fn new(active_category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            transcript: Vec::new(),
            pending_suggestions: Vec::new(),
            active_category: active_category.into(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.pending_suggestions.is_empty() {
            SessionState::Idle
        } else {
            SessionState::AwaitingChoice
        }
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn pending_suggestions(&self) -> &[KnowledgeEntry] {
        &self.pending_suggestions
    }

    /// The transcript for display, oldest turn first.
    pub fn render_transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Plain-text transcript: `You: ...` / `Assistant: ...` blocks separated
    /// by a blank line.
    pub fn export_transcript(&self) -> String {
        self.transcript
            .iter()
            .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    // -- Mutations used by the assistant --

    pub(crate) fn push_turn(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    pub(crate) fn set_pending(&mut self, suggestions: Vec<KnowledgeEntry>) {
        self.pending_suggestions = suggestions;
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending_suggestions.clear();
    }

    pub(crate) fn retain_pending<F>(&mut self, keep: F)
    where
        F: FnMut(&KnowledgeEntry) -> bool,
    {
        self.pending_suggestions.retain(keep);
    }

    pub(crate) fn set_active_category(&mut self, category: impl Into<String>) {
        self.active_category = category.into();
    }

    /// Empty the transcript and suggestions and switch category.
    pub(crate) fn reset(&mut self, category: impl Into<String>) {
        self.transcript.clear();
        self.pending_suggestions.clear();
        self.active_category = category.into();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ALL_CATEGORIES)
    }
}
