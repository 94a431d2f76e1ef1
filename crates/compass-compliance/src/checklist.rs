//! Pre- and post-award compliance checklists.

use std::collections::BTreeSet;

use crate::error::ComplianceError;
use crate::types::{AwardPhase, ComplianceRole};

const PRE_AWARD_ITEMS: &[&str] = &[
    "Complete research security training (CITI/NSF).",
    "Disclose appointments, affiliations, and support per NSPM-33.",
    "Add data management & cybersecurity notes to your proposal.",
    "If controlled tech/data: start a Technology Control Plan (TCP).",
];

const POST_AWARD_ITEMS: &[&str] = &[
    "Confirm all personnel completed required training.",
    "Monitor foreign travel and data handling.",
    "Maintain disclosures/current & pending updates.",
    "If export-controlled: follow TCP and access controls.",
];

/// Checklist items for an award phase, in display order.
pub fn checklist_items(phase: AwardPhase) -> &'static [&'static str] {
    match phase {
        AwardPhase::PreAward => PRE_AWARD_ITEMS,
        AwardPhase::PostAward => POST_AWARD_ITEMS,
    }
}

/// One person's progress through a phase checklist.
#[derive(Debug, Clone)]
pub struct Checklist {
    pub role: ComplianceRole,
    pub phase: AwardPhase,
    done: BTreeSet<usize>,
}

impl Checklist {
    pub fn new(role: ComplianceRole, phase: AwardPhase) -> Self {
        Self {
            role,
            phase,
            done: BTreeSet::new(),
        }
    }

    pub fn items(&self) -> &'static [&'static str] {
        checklist_items(self.phase)
    }

    /// Check or uncheck the item at `index`.
    pub fn set_done(&mut self, index: usize, done: bool) -> Result<(), ComplianceError> {
        let len = self.items().len();
        if index >= len {
            return Err(ComplianceError::ItemOutOfRange { index, len });
        }
        if done {
            self.done.insert(index);
        } else {
            self.done.remove(&index);
        }
        Ok(())
    }

    pub fn is_done(&self, index: usize) -> bool {
        self.done.contains(&index)
    }

    pub fn completed(&self) -> usize {
        self.done.len()
    }

    /// e.g. `Checked off 2/4 items`.
    pub fn progress(&self) -> String {
        format!("Checked off {}/{} items", self.completed(), self.items().len())
    }

    /// Markdown rendering with check boxes and the progress line.
    pub fn render(&self) -> String {
        let mut lines = vec![format!("### {} checklist ({})", self.phase, self.role)];
        for (i, item) in self.items().iter().enumerate() {
            let mark = if self.is_done(i) { "x" } else { " " };
            lines.push(format!("- [{}] {}. {}", mark, i + 1, item));
        }
        lines.push(String::new());
        lines.push(self.progress());
        lines.join("\n")
    }
}
