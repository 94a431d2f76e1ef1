//! Error types for the conversational interface.

/// Rejected chat operations. A rejected operation leaves the session unchanged.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("suggestion index {index} is out of range ({available} pending)")]
    InvalidChoiceIndex { index: usize, available: usize },
}
