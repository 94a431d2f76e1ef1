//! CLI argument definitions for the Compass application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use compass_compliance::{AwardPhase, ComplianceRole};

/// Compass research security FAQ assistant.
#[derive(Parser, Debug)]
#[command(name = "compass", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// FAQ table (CSV or JSON) overriding the configured path.
    #[arg(short = 'k', long = "knowledge-base", global = true)]
    pub knowledge_base: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive conversation (default).
    Chat {
        /// Initial category filter.
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Answer a single question and exit.
    Ask {
        question: String,
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Print an award-phase checklist.
    Checklist {
        #[arg(long, default_value = "pre")]
        phase: AwardPhase,
        #[arg(long, default_value = "pi")]
        role: ComplianceRole,
        /// Item numbers already done (1-based, comma-separated).
        #[arg(long, value_delimiter = ',')]
        done: Vec<usize>,
    },
    /// Draft a Technology Control Plan summary.
    Tcp {
        #[arg(long)]
        project: String,
        #[arg(long)]
        pi: String,
        /// Controlled item (repeatable).
        #[arg(long = "item")]
        items: Vec<String>,
        /// Proposed control (repeatable).
        #[arg(long = "control")]
        controls: Vec<String>,
    },
    /// Report training status for a team.
    Training {
        /// Comma-separated team emails.
        #[arg(long)]
        emails: String,
        /// File listing emails with completed training, one per line.
        #[arg(long)]
        roster: Option<PathBuf>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > COMPASS_CONFIG env var > platform default (~/.compass/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("COMPASS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the knowledge base path.
    ///
    /// Priority: --knowledge-base flag > config file value.
    pub fn resolve_knowledge_base(&self, config_path: &str) -> PathBuf {
        self.knowledge_base
            .clone()
            .unwrap_or_else(|| PathBuf::from(config_path))
    }

    /// The subcommand to run, defaulting to an interactive chat.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat {
            category: "all".to_string(),
        })
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".compass").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".compass").join("config.toml");
    }
    PathBuf::from("config.toml")
}
