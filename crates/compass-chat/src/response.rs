//! Response composition for assistant turns.
//!
//! Turns match outcomes into markdown replies without requiring an LLM.

use std::sync::LazyLock;

use compass_core::{Citation, FallbackSnippet, KnowledgeEntry};
use regex::Regex;

/// Maximum snippet length, in characters, quoted in a fallback answer.
const SNIPPET_CHARS: usize = 180;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn sanitize_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Which picklist message to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// Close questions inside the active category.
    Ambiguous,
    /// Closest questions anywhere in the base.
    Miss,
    /// Suggestions still pending after the category filter changed.
    Narrowed,
}

// =============================================================================
// ResponseComposer
// =============================================================================

/// Builds the text of assistant turns.
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    /// Line appended to "no match" replies.
    pub support_contact: String,
}

impl ResponseComposer {
    pub fn new(support_contact: impl Into<String>) -> Self {
        Self {
            support_contact: support_contact.into(),
        }
    }

    /// The stored answer for a matched entry.
    pub fn compose_answer(&self, entry: &KnowledgeEntry) -> String {
        entry.answer.clone()
    }

    /// A numbered list of candidate questions for the user to choose from.
    pub fn compose_suggestions(
        &self,
        kind: SuggestionKind,
        category: Option<&str>,
        candidates: &[KnowledgeEntry],
    ) -> String {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let intro = match (kind, category) {
            (SuggestionKind::Ambiguous, Some(c)) => format!(
                "I found a few questions about **{}** that might be what you mean. Did you mean:",
                c
            ),
            (SuggestionKind::Ambiguous, None) => {
                "I found a few questions that might be what you mean. Did you mean:".to_string()
            }
            (SuggestionKind::Miss, Some(c)) => format!(
                "I couldn't find an exact match. The closest questions look like **{}** topics:",
                c
            ),
            (SuggestionKind::Miss, None) => {
                "I couldn't find an exact match. The closest questions are:".to_string()
            }
            (SuggestionKind::Narrowed, Some(c)) => {
                format!("Suggestions still available in **{}**:", c)
            }
            (SuggestionKind::Narrowed, None) => "Suggestions still available:".to_string(),
        };

        let mut lines = vec![intro, String::new()];
        for (i, entry) in candidates.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, entry.question));
        }
        lines.join("\n")
    }

    /// Fixed "try rephrasing" reply.
    pub fn compose_no_match(&self) -> String {
        let mut answer = "I couldn't find an answer to that. Try rephrasing your question \
                          or choosing a different category."
            .to_string();
        if !self.support_contact.trim().is_empty() {
            answer.push_str("\n\n");
            answer.push_str(self.support_contact.trim());
        }
        answer
    }

    /// Last-resort answer listing static sources, with their citations.
    pub fn compose_fallback(&self, snippets: &[FallbackSnippet]) -> (String, Vec<Citation>) {
        let header = "I don't have an FAQ answer for this yet. \
                      These public sources cover research security guidance:\n\n";

        let citations: Vec<Citation> = snippets.iter().map(FallbackSnippet::citation).collect();
        let body = if snippets.is_empty() {
            "- No matching sources yet.".to_string()
        } else {
            snippets
                .iter()
                .map(|s| format!("- From **{}**: _{}_", s.title, excerpt(&s.snippet)))
                .collect::<Vec<_>>()
                .join("\n")
        };

        (format!("{}{}", header, body), citations)
    }
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new(compass_core::config::SessionConfig::default().support_contact)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Whitespace-collapsed snippet, cut to `SNIPPET_CHARS`, always ending in `…`.
fn excerpt(text: &str) -> String {
    let clean = sanitize_text(text);
    let cut: String = clean.chars().take(SNIPPET_CHARS).collect();
    format!("{}…", cut.trim_end())
}

// =============================================================================
// Tests
// =============================================================================
