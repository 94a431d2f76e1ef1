//! Assistant: central coordinator wiring the match engine, session, and
//! response composer.
//!
//! Every user action maps to one transition on a caller-owned [`Session`]:
//!
//! - `submit` appends a user turn, classifies it and appends the reply
//! - `choose` answers one of the pending suggestions
//! - `change_category` switches the filter according to the configured policy

use std::sync::Arc;

use compass_core::config::SessionConfig;
use compass_core::knowledge::{is_all_categories, same_category};
use compass_core::{CategoryChangePolicy, CompassConfig, KnowledgeBase, KnowledgeStore, Turn};
use tracing::{debug, info};

use crate::error::ChatError;
use crate::fallback::{FallbackSource, StaticFallback};
use crate::matcher::{MatchEngine, MatchResult};
use crate::response::{ResponseComposer, SuggestionKind};
use crate::session::Session;

/// Coordinates matching and session transitions over a shared knowledge base.
pub struct Assistant {
    knowledge: Arc<KnowledgeStore>,
    engine: MatchEngine,
    composer: ResponseComposer,
    fallback: Box<dyn FallbackSource>,
    session_config: SessionConfig,
}

impl Assistant {
    /// Create an assistant reading from `knowledge`.
    pub fn new(knowledge: Arc<KnowledgeStore>, config: &CompassConfig) -> Self {
        Self {
            knowledge,
            engine: MatchEngine::new(config.matching.clone()),
            composer: ResponseComposer::new(config.session.support_contact.clone()),
            fallback: Box::new(StaticFallback::new(&config.fallback)),
            session_config: config.session.clone(),
        }
    }

    /// Create an assistant over a fixed knowledge base.
    pub fn with_knowledge_base(kb: KnowledgeBase, config: &CompassConfig) -> Self {
        Self::new(Arc::new(KnowledgeStore::new(kb)), config)
    }

    /// Replace the last-resort source list.
    pub fn with_fallback(mut self, fallback: Box<dyn FallbackSource>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeStore> {
        &self.knowledge
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// A new session using the `all` filter.
    pub fn start_session(&self) -> Session {
        let session = Session::default();
        debug!(session_id = %session.id, "Session started");
        session
    }

    /// Handle one user message under `category_filter`.
    ///
    /// If the filter differs from the session's active category the category
    /// change is applied first. Returns the classification that drove the
    /// reply.
    pub fn submit(&self, session: &mut Session, query: &str, category_filter: &str) -> MatchResult {
        if !same_category(category_filter, session.active_category()) {
            self.change_category(session, category_filter);
        }

        session.push_turn(Turn::user(query));

        let kb = self.knowledge.snapshot();
        let result = self
            .engine
            .classify_in(query, &kb, session.active_category());

        debug!(
            session_id = %session.id,
            outcome = result.kind(),
            category = session.active_category(),
            "Query classified"
        );

        match &result {
            MatchResult::Exact { entry, .. } => {
                session.push_turn(Turn::assistant(self.composer.compose_answer(entry)));
                session.clear_pending();
            }
            MatchResult::Ambiguous {
                candidates,
                inferred_category,
            } => {
                let text = self.composer.compose_suggestions(
                    SuggestionKind::Ambiguous,
                    Some(inferred_category),
                    candidates,
                );
                session.push_turn(Turn::assistant(text));
                session.set_pending(candidates.clone());
            }
            MatchResult::Miss {
                fallback_candidates,
                inferred_category,
            } => {
                let text = self.composer.compose_suggestions(
                    SuggestionKind::Miss,
                    inferred_category.as_deref(),
                    fallback_candidates,
                );
                session.push_turn(Turn::assistant(text));
                session.set_pending(fallback_candidates.clone());
            }
            MatchResult::NoMatch => {
                session.push_turn(self.no_match_turn(&kb));
                session.clear_pending();
            }
        }

        result
    }

    /// Answer the pending suggestion at `index`.
    ///
    /// An out-of-range index (including any index while nothing is pending)
    /// is rejected and the session is left untouched.
    pub fn choose(&self, session: &mut Session, index: usize) -> Result<(), ChatError> {
        let available = session.pending_suggestions().len();
        let Some(entry) = session.pending_suggestions().get(index).cloned() else {
            return Err(ChatError::InvalidChoiceIndex { index, available });
        };

        debug!(session_id = %session.id, index, question = %entry.question, "Suggestion chosen");
        session.push_turn(Turn::assistant(self.composer.compose_answer(&entry)));
        session.clear_pending();
        Ok(())
    }

    /// Switch the session's category filter.
    ///
    /// Under [`CategoryChangePolicy::Reset`] the transcript and suggestions
    /// are discarded. Under [`CategoryChangePolicy::Preserve`] the transcript
    /// is kept and pending suggestions outside the new category are dropped;
    /// if that shortens a non-empty list, the survivors are listed again so
    /// the numbers shown match the indices `choose` accepts.
    pub fn change_category(&self, session: &mut Session, category: &str) {
        match self.session_config.category_change {
            CategoryChangePolicy::Reset => {
                info!(
                    session_id = %session.id,
                    from = session.active_category(),
                    to = category,
                    "Category changed; conversation reset"
                );
                session.reset(category);
            }
            CategoryChangePolicy::Preserve => {
                let kb = self.knowledge.snapshot();
                let known = kb.categories().iter().any(|c| same_category(c, category));
                let before = session.pending_suggestions().len();
                if !is_all_categories(category) && known {
                    session.retain_pending(|e| same_category(&e.category, category));
                }
                // Renumber on screen whenever the list the user sees changed.
                let remaining = session.pending_suggestions();
                if !remaining.is_empty() && remaining.len() < before {
                    let text = self.composer.compose_suggestions(
                        SuggestionKind::Narrowed,
                        Some(category),
                        remaining,
                    );
                    session.push_turn(Turn::assistant(text));
                }
                info!(
                    session_id = %session.id,
                    from = session.active_category(),
                    to = category,
                    pending = session.pending_suggestions().len(),
                    "Category changed; conversation preserved"
                );
                session.set_active_category(category);
            }
        }
    }

    fn no_match_turn(&self, kb: &KnowledgeBase) -> Turn {
        if kb.is_empty() {
            let snippets = self.fallback.snippets();
            if !snippets.is_empty() {
                let (text, citations) = self.composer.compose_fallback(&snippets);
                return Turn::assistant(text).with_citations(citations);
            }
        }
        Turn::assistant(self.composer.compose_no_match())
    }
}

// =============================================================================
// Tests
// =============================================================================
