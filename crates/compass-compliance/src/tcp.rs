//! Technology Control Plan (TCP) summary drafting.

use crate::error::ComplianceError;

/// Controlled items offered by the TCP form.
pub const CONTROLLED_ITEM_OPTIONS: &[&str] = &[
    "EAR-controlled tech/data",
    "ITAR-controlled tech/data",
    "Export-restricted software",
    "Human-subjects identifiable data",
    "Other controlled data",
];

/// Safeguards offered by the TCP form.
pub const CONTROL_OPTIONS: &[&str] = &[
    "Physical lab access restrictions",
    "Secure data enclave/VPN",
    "No BYOD for controlled data",
    "Sponsor-approved visitor policy",
    "Whitelisted collaborators only",
];

const NEXT_STEP: &str = "Review with ORA; if export-controlled, finalize TCP and access lists.";

/// Inputs for a draft Technology Control Plan summary.
#[derive(Debug, Clone, Default)]
pub struct TcpRequest {
    pub project_title: String,
    pub pi_name: String,
    pub controlled_items: Vec<String>,
    pub controls: Vec<String>,
}

impl TcpRequest {
    /// Render the markdown summary.
    ///
    /// Project title and PI are required; empty lists render as `—`.
    /// Selections outside the standard form options are called out on their
    /// own line so ORA can review them.
    pub fn summarize(&self) -> Result<String, ComplianceError> {
        let project = self.project_title.trim();
        if project.is_empty() {
            return Err(ComplianceError::MissingField("project title"));
        }
        let pi = self.pi_name.trim();
        if pi.is_empty() {
            return Err(ComplianceError::MissingField("PI name"));
        }

        let mut lines = vec![
            "### TCP Summary".to_string(),
            format!("**Project:** {}", project),
            format!("**PI:** {}", pi),
            format!("**Controlled items:** {}", join_or_dash(&self.controlled_items)),
            format!("**Controls:** {}", join_or_dash(&self.controls)),
        ];
        let custom = self.custom_selections();
        if !custom.is_empty() {
            lines.push(format!("**Non-standard selections:** {}", custom.join(", ")));
        }
        lines.push(format!("**Next step:** {}", NEXT_STEP));
        Ok(lines.join("\n"))
    }

    /// Selections that are not among the standard form options.
    pub fn custom_selections(&self) -> Vec<&str> {
        let items = self
            .controlled_items
            .iter()
            .filter(|i| !CONTROLLED_ITEM_OPTIONS.contains(&i.as_str()));
        let controls = self
            .controls
            .iter()
            .filter(|c| !CONTROL_OPTIONS.contains(&c.as_str()));
        items.chain(controls).map(String::as_str).collect()
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "—".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TcpRequest {
        TcpRequest {
            project_title: "Quantum Sensors".to_string(),
            pi_name: "Dr. Rivera".to_string(),
            controlled_items: vec!["EAR-controlled tech/data".to_string()],
            controls: vec![
                "Secure data enclave/VPN".to_string(),
                "No BYOD for controlled data".to_string(),
            ],
        }
    }

    #[test]
    fn test_summary_contents() {
        let text = request().summarize().unwrap();
        assert!(text.starts_with("### TCP Summary"));
        assert!(text.contains("**Project:** Quantum Sensors"));
        assert!(text.contains("**PI:** Dr. Rivera"));
        assert!(text.contains("**Controlled items:** EAR-controlled tech/data"));
        assert!(text.contains("**Controls:** Secure data enclave/VPN, No BYOD for controlled data"));
        assert!(text.ends_with(NEXT_STEP));
    }

    #[test]
    fn test_summary_empty_lists_use_dash() {
        let req = TcpRequest {
            controlled_items: vec![],
            controls: vec![],
            ..request()
        };
        let text = req.summarize().unwrap();
        assert!(text.contains("**Controlled items:** —"));
        assert!(text.contains("**Controls:** —"));
    }

    #[test]
    fn test_missing_project_title() {
        let req = TcpRequest {
            project_title: "  ".to_string(),
            ..request()
        };
        assert_eq!(
            req.summarize(),
            Err(ComplianceError::MissingField("project title"))
        );
    }

    #[test]
    fn test_missing_pi() {
        let req = TcpRequest {
            pi_name: String::new(),
            ..request()
        };
        assert_eq!(req.summarize(), Err(ComplianceError::MissingField("PI name")));
    }

    #[test]
    fn test_custom_selections() {
        let mut req = request();
        assert!(req.custom_selections().is_empty());
        req.controls.push("Badge-only server room".to_string());
        assert_eq!(req.custom_selections(), vec!["Badge-only server room"]);
    }

    #[test]
    fn test_summary_flags_non_standard_selections() {
        let mut req = request();
        let text = req.summarize().unwrap();
        assert!(!text.contains("Non-standard"));

        req.controlled_items.push("Prototype sensor firmware".to_string());
        req.controls.push("Badge-only server room".to_string());
        let text = req.summarize().unwrap();
        assert!(text.contains(
            "**Non-standard selections:** Prototype sensor firmware, Badge-only server room\n**Next step:**"
        ));
        assert!(text.ends_with(NEXT_STEP));
    }
}
