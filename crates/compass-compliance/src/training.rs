//! Training status lookups through an injected provider.

use std::collections::HashSet;

use crate::error::ComplianceError;
use crate::types::TrainingStatus;

/// Source of training completion records (CITI export, HR system, ...).
pub trait TrainingStatusProvider: Send + Sync {
    fn status(&self, email: &str) -> TrainingStatus;
}

/// Provider backed by a set of emails known to have completed training.
///
/// Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct RosterProvider {
    completed: HashSet<String>,
}

impl RosterProvider {
    pub fn new<I, S>(completed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            completed: completed
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// One email per line; blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

impl TrainingStatusProvider for RosterProvider {
    fn status(&self, email: &str) -> TrainingStatus {
        if self.completed.contains(&email.trim().to_lowercase()) {
            TrainingStatus::Completed
        } else {
            TrainingStatus::NotRecorded
        }
    }
}

/// Split a comma-separated email list, dropping blank entries.
pub fn parse_emails(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Status of every email in `input`, in input order.
pub fn training_report(
    provider: &dyn TrainingStatusProvider,
    input: &str,
) -> Result<Vec<(String, TrainingStatus)>, ComplianceError> {
    let emails = parse_emails(input);
    if emails.is_empty() {
        return Err(ComplianceError::EmptyRoster);
    }
    let report: Vec<(String, TrainingStatus)> = emails
        .into_iter()
        .map(|email| {
            let status = provider.status(&email);
            (email, status)
        })
        .collect();
    tracing::debug!(
        people = report.len(),
        completed = report
            .iter()
            .filter(|(_, s)| *s == TrainingStatus::Completed)
            .count(),
        "Training report generated"
    );
    Ok(report)
}
