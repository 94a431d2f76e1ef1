//! Line-oriented chat loop.
//!
//! Plain text is submitted as a question; slash commands drive the other
//! session transitions.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use compass_chat::{Assistant, Session, SessionState};
use compass_core::Turn;

const HELP: &str = "Commands:
  /choose N        answer suggestion N
  /category NAME   switch category (use \"all\" for every category)
  /categories      list categories
  /export [PATH]   print or save the transcript
  /reload          reload the FAQ table from disk
  /help            show this message
  /quit            leave";

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    /// Zero-based suggestion index.
    Choose(usize),
    Category(String),
    Categories,
    Export(Option<PathBuf>),
    Reload,
    Help,
    Quit,
    Invalid(String),
}

/// Parse a line. Suggestion numbers are typed 1-based.
pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Ask(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_lowercase().as_str() {
        "choose" | "c" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => ReplCommand::Choose(n - 1),
            _ => ReplCommand::Invalid(format!("Usage: /choose N (got '{}')", arg)),
        },
        "category" => {
            if arg.is_empty() {
                ReplCommand::Invalid("Usage: /category NAME".to_string())
            } else {
                ReplCommand::Category(arg.to_string())
            }
        }
        "categories" => ReplCommand::Categories,
        "export" => ReplCommand::Export((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "reload" => ReplCommand::Reload,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Invalid(format!("Unknown command: /{}", other)),
    }
}

/// Print a turn with its citations.
pub fn write_turn<W: Write>(out: &mut W, turn: &Turn) -> io::Result<()> {
    writeln!(out, "{}: {}", turn.role.label(), turn.text)?;
    if !turn.citations.is_empty() {
        writeln!(out, "Sources:")?;
        for citation in &turn.citations {
            writeln!(out, "  - {} <{}>", citation.title, citation.url)?;
        }
    }
    writeln!(out)
}

/// Drive `session` from `input` until EOF or `/quit`.
///
/// `/reload` re-reads the FAQ table from `knowledge_path`.
pub fn run<R: BufRead, W: Write>(
    assistant: &Assistant,
    session: &mut Session,
    knowledge_path: &Path,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(
        out,
        "Ask a research security question (category: {}). Type /help for commands.",
        session.active_category()
    )?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let shown = session.render_transcript().len();

        match parse_command(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Help => writeln!(out, "{}", HELP)?,
            ReplCommand::Invalid(msg) => writeln!(out, "{}", msg)?,
            ReplCommand::Ask(text) => {
                let category = session.active_category().to_string();
                assistant.submit(session, &text, &category);
            }
            ReplCommand::Choose(index) => {
                if let Err(e) = assistant.choose(session, index) {
                    tracing::debug!(error = %e, "Choice rejected");
                    writeln!(out, "There is no suggestion {} to choose.", index + 1)?;
                }
            }
            ReplCommand::Category(name) => {
                assistant.change_category(session, &name);
                writeln!(out, "Category set to {}.", session.active_category())?;
            }
            ReplCommand::Categories => {
                let kb = assistant.knowledge().snapshot();
                writeln!(out, "all")?;
                for category in kb.categories() {
                    writeln!(out, "{}", category)?;
                }
            }
            ReplCommand::Reload => match assistant.knowledge().reload(knowledge_path) {
                Ok(entries) => writeln!(out, "Reloaded {} FAQ entries.", entries)?,
                Err(e) => {
                    tracing::warn!(path = %knowledge_path.display(), error = %e, "Knowledge base reload failed");
                    writeln!(out, "Reload failed ({}); keeping the current FAQ table.", e)?;
                }
            },
            ReplCommand::Export(None) => writeln!(out, "{}", session.export_transcript())?,
            ReplCommand::Export(Some(path)) => {
                match std::fs::write(&path, session.export_transcript()) {
                    Ok(()) => writeln!(out, "Transcript saved to {}.", path.display())?,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Transcript export failed");
                        writeln!(out, "Could not save transcript: {}", e)?;
                    }
                }
            }
        }

        // A reset can shrink the transcript below what was already shown.
        let turns = session.render_transcript();
        for turn in turns.iter().skip(shown.min(turns.len())) {
            write_turn(out, turn)?;
        }
        if session.state() == SessionState::AwaitingChoice && turns.len() > shown {
            writeln!(out, "(reply with /choose N)")?;
        }
        out.flush()?;
    }
    Ok(())
}
