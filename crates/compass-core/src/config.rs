use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CompassError, Result};
use crate::types::FallbackSnippet;

/// Top-level configuration for the Compass assistant.
///
/// Loaded from `~/.compass/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompassConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl CompassConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CompassConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.matching.validate()
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Path to the FAQ table (CSV or JSON).
    pub knowledge_base: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            knowledge_base: "data/faq.csv".to_string(),
        }
    }
}

/// Fuzzy matching thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Best score at or above which the top entry is answered directly.
    pub exact_threshold: f32,
    /// Best score at or above which the user is offered a picklist.
    pub ambiguous_threshold: f32,
    /// Acceptance cutoff for the loose suggestion search.
    pub suggestion_cutoff: f32,
    /// Maximum number of suggestions offered at once.
    pub max_suggestions: usize,
    /// Queries longer than this are cut to this many characters before
    /// scoring, which bounds the cost of each classification.
    pub max_query_chars: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            exact_threshold: 0.85,
            ambiguous_threshold: 0.60,
            suggestion_cutoff: 0.4,
            max_suggestions: 3,
            max_query_chars: 2000,
        }
    }
}

impl MatchConfig {
    /// Thresholds must lie in [0, 1] and be ordered
    /// `suggestion_cutoff <= ambiguous_threshold <= exact_threshold`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("exact_threshold", self.exact_threshold),
            ("ambiguous_threshold", self.ambiguous_threshold),
            ("suggestion_cutoff", self.suggestion_cutoff),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CompassError::Config(format!(
                    "matching.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.ambiguous_threshold > self.exact_threshold {
            return Err(CompassError::Config(
                "matching.ambiguous_threshold must not exceed matching.exact_threshold"
                    .to_string(),
            ));
        }
        if self.suggestion_cutoff > self.ambiguous_threshold {
            return Err(CompassError::Config(
                "matching.suggestion_cutoff must not exceed matching.ambiguous_threshold"
                    .to_string(),
            ));
        }
        if self.max_suggestions == 0 {
            return Err(CompassError::Config(
                "matching.max_suggestions must be at least 1".to_string(),
            ));
        }
        if self.max_query_chars == 0 {
            return Err(CompassError::Config(
                "matching.max_query_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What happens to the conversation when the category filter changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryChangePolicy {
    /// Discard the transcript and pending suggestions.
    #[default]
    Reset,
    /// Keep the transcript; drop pending suggestions outside the new category.
    Preserve,
}

/// Conversation session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub category_change: CategoryChangePolicy,
    /// Line appended to "no match" replies.
    pub support_contact: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            category_change: CategoryChangePolicy::Reset,
            support_contact: "If you still need help, contact the Office of Research \
                              Administration (ORA) research security team."
                .to_string(),
        }
    }
}

/// Static sources shown when the knowledge base has nothing to offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// A source is only surfaced if its URL contains one of these domains.
    pub allowed_domains: Vec<String>,
    pub sources: Vec<FallbackSnippet>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        let source = |title: &str, url: &str, snippet: &str| FallbackSnippet {
            title: title.to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
        };
        Self {
            allowed_domains: ["morgan.edu", "whitehouse.gov", "ostp.gov", "dni.gov", "nsf.gov"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            sources: vec![
                source(
                    "MSU Research Security",
                    "https://www.morgan.edu/office-of-research-administration/research-compliance/research-security",
                    "Morgan State University research security program: training, disclosure, \
                     and Technology Control Plan guidance from the Office of Research Administration.",
                ),
                source(
                    "White House OSTP",
                    "https://www.whitehouse.gov/ostp/",
                    "Federal research security policy, including NSPM-33 implementation guidance.",
                ),
                source(
                    "Office of the Director of National Intelligence",
                    "https://www.dni.gov/",
                    "National counterintelligence and security resources for academic research.",
                ),
                source(
                    "National Science Foundation",
                    "https://new.nsf.gov/",
                    "NSF research security requirements for proposers and awardees.",
                ),
            ],
        }
    }
}
