//! Compass application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize logging
//! 3. Load the FAQ knowledge base into a shared store
//! 4. Run the requested subcommand (interactive chat by default)

mod cli;
mod repl;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use compass_chat::Assistant;
use compass_compliance::{
    training_report, Checklist, ComplianceError, RosterProvider, TcpRequest,
};
use compass_core::config::CompassConfig;
use compass_core::{load_knowledge_base, KnowledgeStore};

use cli::{CliArgs, Command};

fn init_logging(cli_level: Option<&str>, config_level: &str) {
    let filter = match cli_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config_level)),
    };
    // stdout belongs to the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_assistant(kb_path: &Path, config: &CompassConfig) -> Assistant {
    let kb = load_knowledge_base(kb_path);
    if kb.is_empty() {
        tracing::warn!(path = %kb_path.display(), "Knowledge base is empty; answers will come from fallback sources");
    }
    let store = Arc::new(KnowledgeStore::new(kb));
    Assistant::new(store, config)
}

fn load_roster(path: Option<&Path>) -> io::Result<RosterProvider> {
    match path {
        Some(p) => Ok(RosterProvider::from_lines(&std::fs::read_to_string(p)?)),
        None => Ok(RosterProvider::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before logging so its level can seed the filter.
    let config_file = args.resolve_config_path();
    let loaded = if config_file.exists() {
        Some(CompassConfig::load(&config_file))
    } else {
        None
    };
    let config_level = match &loaded {
        Some(Ok(c)) => c.general.log_level.clone(),
        _ => "info".to_string(),
    };
    init_logging(args.log_level.as_deref(), &config_level);

    let config = match loaded {
        Some(Ok(c)) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            c
        }
        Some(Err(e)) => {
            tracing::warn!(path = %config_file.display(), error = %e, "Invalid config; using defaults");
            CompassConfig::default()
        }
        None => {
            tracing::debug!(path = %config_file.display(), "No config file; using defaults");
            CompassConfig::default()
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command() {
        Command::Chat { category } => {
            let kb_path = args.resolve_knowledge_base(&config.general.knowledge_base);
            let assistant = build_assistant(&kb_path, &config);
            let mut session = compass_chat::Session::new(category);
            tracing::info!(session_id = %session.id, "Chat started");
            repl::run(&assistant, &mut session, &kb_path, io::stdin().lock(), &mut out)?;
        }
        Command::Ask { question, category } => {
            let kb_path = args.resolve_knowledge_base(&config.general.knowledge_base);
            let assistant = build_assistant(&kb_path, &config);
            let mut session = assistant.start_session();
            assistant.submit(&mut session, &question, &category);
            if let Some(reply) = session.render_transcript().last() {
                repl::write_turn(&mut out, reply)?;
            }
        }
        Command::Checklist { phase, role, done } => {
            let mut checklist = Checklist::new(role, phase);
            let len = checklist.items().len();
            // Item numbers on the command line are 1-based.
            for n in done {
                if n == 0 || n > len {
                    return Err(ComplianceError::ItemOutOfRange { index: n, len }.into());
                }
                checklist.set_done(n - 1, true)?;
            }
            writeln!(out, "{}", checklist.render())?;
        }
        Command::Tcp {
            project,
            pi,
            items,
            controls,
        } => {
            let request = TcpRequest {
                project_title: project,
                pi_name: pi,
                controlled_items: items,
                controls,
            };
            writeln!(out, "{}", request.summarize()?)?;
        }
        Command::Training { emails, roster } => {
            let provider = load_roster(roster.as_deref())?;
            if provider.is_empty() {
                writeln!(
                    out,
                    "No training roster loaded; connect a CITI/NSF export with --roster."
                )?;
            }
            for (email, status) in training_report(&provider, &emails)? {
                writeln!(out, "{}: {}", email, status)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
