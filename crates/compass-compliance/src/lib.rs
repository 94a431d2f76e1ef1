//! Research-compliance helpers for Compass.
//!
//! Award-phase checklists, Technology Control Plan summaries, and training
//! status reports. Training data comes from an injected provider; nothing
//! here talks to external systems.

pub mod checklist;
pub mod error;
pub mod tcp;
pub mod training;
pub mod types;

pub use checklist::Checklist;
pub use error::ComplianceError;
pub use tcp::TcpRequest;
pub use training::{training_report, RosterProvider, TrainingStatusProvider};
pub use types::{AwardPhase, ComplianceRole, TrainingStatus};
