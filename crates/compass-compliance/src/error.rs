//! Error types for the compliance helpers.

/// Errors from checklist, TCP, and training operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComplianceError {
    #[error("Required field missing: {0}")]
    MissingField(&'static str),
    #[error("Add at least one email")]
    EmptyRoster,
    #[error("Checklist item {index} does not exist ({len} items)")]
    ItemOutOfRange { index: usize, len: usize },
}
