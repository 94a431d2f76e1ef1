//! Value types shared by the compliance helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Award lifecycle phase a checklist applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardPhase {
    PreAward,
    PostAward,
}

impl fmt::Display for AwardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwardPhase::PreAward => write!(f, "Pre-Award"),
            AwardPhase::PostAward => write!(f, "Post-Award"),
        }
    }
}

impl std::str::FromStr for AwardPhase {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pre" | "pre-award" | "pre_award" => Ok(AwardPhase::PreAward),
            "post" | "post-award" | "post_award" => Ok(AwardPhase::PostAward),
            _ => Err(format!("Unknown award phase: {}", s)),
        }
    }
}

/// Who is working through a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceRole {
    PrincipalInvestigator,
    DepartmentAdmin,
    OraStaff,
}

impl fmt::Display for ComplianceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceRole::PrincipalInvestigator => write!(f, "PI/Co-PI"),
            ComplianceRole::DepartmentAdmin => write!(f, "Department Admin"),
            ComplianceRole::OraStaff => write!(f, "ORA Staff"),
        }
    }
}

impl std::str::FromStr for ComplianceRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pi" | "co-pi" | "pi/co-pi" => Ok(ComplianceRole::PrincipalInvestigator),
            "admin" | "department admin" | "department-admin" => {
                Ok(ComplianceRole::DepartmentAdmin)
            }
            "ora" | "ora staff" | "ora-staff" => Ok(ComplianceRole::OraStaff),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Training completion as reported by a status provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Completed,
    NotRecorded,
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingStatus::Completed => write!(f, "Completed"),
            TrainingStatus::NotRecorded => write!(f, "Not recorded"),
        }
    }
}
