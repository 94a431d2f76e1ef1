//! Shared domain types for the Compass assistant.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Knowledge entries
// =============================================================================

/// One row of the FAQ table.
///
/// Field names follow the `Category, Question, Answer` column headers of the
/// source file. The answer may contain simple markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(
        category: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

// =============================================================================
// Citations and fallback sources
// =============================================================================

/// A (title, url) pair attached to an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

impl Citation {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A static placeholder source surfaced when no FAQ entry is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackSnippet {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl FallbackSnippet {
    /// The citation this snippet contributes to an answer.
    pub fn citation(&self) -> Citation {
        Citation::new(self.title.clone(), self.url.clone())
    }
}

// =============================================================================
// Transcript turns
// =============================================================================

/// Who authored a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used in exported transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    /// Markdown text.
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            citations: Vec::new(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            citations: Vec::new(),
        }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_from_column_names() {
        let json = r#"{"Category":"Training","Question":"How?","Answer":"Use CITI."}"#;
        let entry: KnowledgeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry, KnowledgeEntry::new("Training", "How?", "Use CITI."));
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Assistant.label(), "Assistant");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_turn_without_citations_omits_field() {
        let json = serde_json::to_string(&Turn::user("hi")).unwrap();
        assert!(!json.contains("citations"));
    }

    #[test]
    fn test_turn_with_citations() {
        let turn = Turn::assistant("see").with_citations(vec![Citation::new("NSF", "https://nsf.gov")]);
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.citations.len(), 1);
        assert_eq!(turn.citations[0].url, "https://nsf.gov");
    }

    #[test]
    fn test_snippet_citation() {
        let snippet = FallbackSnippet {
            title: "DNI".to_string(),
            url: "https://www.dni.gov/".to_string(),
            snippet: "text".to_string(),
        };
        assert_eq!(snippet.citation(), Citation::new("DNI", "https://www.dni.gov/"));
    }
}
