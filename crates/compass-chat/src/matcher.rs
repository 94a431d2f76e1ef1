//! Fuzzy question matching and outcome classification.
//!
//! Scores a free-text query against every FAQ question and sorts the result
//! into one of four outcomes: a direct answer, a short picklist within the
//! active category, a picklist drawn from the whole base, or nothing.

use compass_core::knowledge::{is_all_categories, normalize_category};
use compass_core::{KnowledgeBase, KnowledgeEntry, MatchConfig};
use tracing::debug;

use crate::similarity::score;

/// Classified outcome of matching one query.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// The best question is close enough to answer directly.
    Exact { entry: KnowledgeEntry, score: f32 },
    /// Several questions in the filtered set are plausible.
    Ambiguous {
        candidates: Vec<KnowledgeEntry>,
        inferred_category: String,
    },
    /// Nothing close in the filtered set; closest questions from the whole base.
    Miss {
        fallback_candidates: Vec<KnowledgeEntry>,
        inferred_category: Option<String>,
    },
    NoMatch,
}

impl MatchResult {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchResult::Exact { .. } => "exact",
            MatchResult::Ambiguous { .. } => "ambiguous",
            MatchResult::Miss { .. } => "miss",
            MatchResult::NoMatch => "no_match",
        }
    }

    /// Entries the user may pick from. Empty for `Exact` and `NoMatch`.
    pub fn suggestions(&self) -> &[KnowledgeEntry] {
        match self {
            MatchResult::Ambiguous { candidates, .. } => candidates,
            MatchResult::Miss {
                fallback_candidates,
                ..
            } => fallback_candidates,
            MatchResult::Exact { .. } | MatchResult::NoMatch => &[],
        }
    }
}

/// Highest-scoring candidate and its score.
///
/// The first candidate wins ties. Returns `None` for an empty slice.
pub fn best_match<'a>(
    query: &str,
    candidates: &'a [KnowledgeEntry],
) -> Option<(&'a KnowledgeEntry, f32)> {
    pick_best(&score_all(query, candidates))
}

/// Every candidate scoring at least `cutoff`, best first, at most `limit`.
///
/// Equal scores keep their original order.
pub fn close_matches<'a>(
    query: &str,
    candidates: &'a [KnowledgeEntry],
    cutoff: f32,
    limit: usize,
) -> Vec<(&'a KnowledgeEntry, f32)> {
    rank(&score_all(query, candidates), cutoff, limit)
}

fn score_all<'a>(query: &str, candidates: &'a [KnowledgeEntry]) -> Vec<(&'a KnowledgeEntry, f32)> {
    candidates
        .iter()
        .map(|entry| (entry, score(query, &entry.question)))
        .collect()
}

fn pick_best<'a>(scored: &[(&'a KnowledgeEntry, f32)]) -> Option<(&'a KnowledgeEntry, f32)> {
    let mut best: Option<(&KnowledgeEntry, f32)> = None;
    for &(entry, s) in scored {
        match best {
            Some((_, best_score)) if s <= best_score => {}
            _ => best = Some((entry, s)),
        }
    }
    best
}

fn rank<'a>(
    scored: &[(&'a KnowledgeEntry, f32)],
    cutoff: f32,
    limit: usize,
) -> Vec<(&'a KnowledgeEntry, f32)> {
    let mut kept: Vec<(&KnowledgeEntry, f32)> =
        scored.iter().copied().filter(|(_, s)| *s >= cutoff).collect();
    kept.sort_by(|a, b| b.1.total_cmp(&a.1));
    kept.truncate(limit);
    kept
}

/// The first `max_chars` characters of `query`.
fn bounded(query: &str, max_chars: usize) -> &str {
    match query.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            debug!(max_chars, "Query truncated before scoring");
            &query[..cut]
        }
        None => query,
    }
}

fn category_of(entries: &[(&KnowledgeEntry, f32)]) -> Option<String> {
    entries
        .first()
        .map(|(entry, _)| entry.category.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn owned(entries: Vec<(&KnowledgeEntry, f32)>) -> Vec<KnowledgeEntry> {
    entries.into_iter().map(|(entry, _)| entry.clone()).collect()
}

// =============================================================================
// MatchEngine
// =============================================================================

/// Threshold-driven classifier over a knowledge base.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Classify `query` against `filtered`, widening to `global` on a miss.
    ///
    /// - blank query or empty `filtered` -> `NoMatch`
    /// - best score >= exact threshold -> `Exact`
    /// - best score >= ambiguous threshold -> `Ambiguous` from a loose search
    ///   of `filtered`
    /// - otherwise a loose search of `global` -> `Miss`, or `NoMatch` if it
    ///   finds nothing
    ///
    /// Only the first `max_query_chars` characters of the query are scored.
    pub fn classify(
        &self,
        query: &str,
        filtered: &[KnowledgeEntry],
        global: &[KnowledgeEntry],
    ) -> MatchResult {
        if query.trim().is_empty() {
            debug!("Blank query");
            return MatchResult::NoMatch;
        }
        let query = bounded(query, self.config.max_query_chars);
        let filtered = score_all(query, filtered);
        self.classify_scored(&filtered, || score_all(query, global))
    }

    /// Classify against `kb` narrowed to `category`.
    ///
    /// Each entry is scored once; the category filter is applied to the
    /// scores, with the same whole-base fallback as
    /// [`KnowledgeBase::filter_by_category`].
    pub fn classify_in(&self, query: &str, kb: &KnowledgeBase, category: &str) -> MatchResult {
        if query.trim().is_empty() {
            debug!("Blank query");
            return MatchResult::NoMatch;
        }
        let query = bounded(query, self.config.max_query_chars);
        let global = score_all(query, kb.entries());

        let filtered: Vec<(&KnowledgeEntry, f32)> = if is_all_categories(category) {
            global.clone()
        } else {
            let wanted = normalize_category(category);
            let in_category: Vec<_> = global
                .iter()
                .copied()
                .filter(|(e, _)| normalize_category(&e.category) == wanted)
                .collect();
            if in_category.is_empty() {
                global.clone()
            } else {
                in_category
            }
        };

        self.classify_scored(&filtered, || global)
    }

    fn classify_scored<'a, F>(&self, filtered: &[(&'a KnowledgeEntry, f32)], global: F) -> MatchResult
    where
        F: FnOnce() -> Vec<(&'a KnowledgeEntry, f32)>,
    {
        let Some((best_entry, best_score)) = pick_best(filtered) else {
            debug!("No candidates to match against");
            return MatchResult::NoMatch;
        };

        if best_score >= self.config.exact_threshold {
            debug!(score = best_score, question = %best_entry.question, "Exact match");
            return MatchResult::Exact {
                entry: best_entry.clone(),
                score: best_score,
            };
        }

        if best_score >= self.config.ambiguous_threshold {
            let close = rank(
                filtered,
                self.config.suggestion_cutoff,
                self.config.max_suggestions,
            );
            if !close.is_empty() {
                let inferred_category = category_of(&close).unwrap_or_default();
                debug!(
                    score = best_score,
                    candidates = close.len(),
                    category = %inferred_category,
                    "Ambiguous match"
                );
                return MatchResult::Ambiguous {
                    candidates: owned(close),
                    inferred_category,
                };
            }
        }

        let close = rank(
            &global(),
            self.config.suggestion_cutoff,
            self.config.max_suggestions,
        );
        if close.is_empty() {
            debug!(score = best_score, "No match");
            return MatchResult::NoMatch;
        }
        let inferred_category = category_of(&close);
        debug!(
            score = best_score,
            candidates = close.len(),
            category = ?inferred_category,
            "Miss; offering global suggestions"
        );
        MatchResult::Miss {
            fallback_candidates: owned(close),
            inferred_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, question: &str) -> KnowledgeEntry {
        KnowledgeEntry::new(category, question, format!("answer to {}", question))
    }

    fn engine() -> MatchEngine {
        MatchEngine::default()
    }

    fn research_kb() -> Vec<KnowledgeEntry> {
        vec![
            entry("Policy", "What does NSPM-33 require?"),
            entry("Export Control", "Technology Control Plan steps"),
            entry("Training", "Training requirements"),
            entry("Training", "How do I complete training?"),
            entry("Disclosure", "What must I disclose about foreign support?"),
        ]
    }

    // ---- best_match ----

    #[test]
    fn test_best_match_empty() {
        assert!(best_match("anything", &[]).is_none());
    }

    #[test]
    fn test_best_match_picks_highest() {
        let kb = research_kb();
        let (e, s) = best_match("training requirement", &kb).unwrap();
        assert_eq!(e.question, "Training requirements");
        assert!(s > 0.9);
    }

    #[test]
    fn test_best_match_first_wins_ties() {
        let kb = vec![
            KnowledgeEntry::new("A", "same question", "first"),
            KnowledgeEntry::new("B", "same question", "second"),
        ];
        let (e, s) = best_match("same question", &kb).unwrap();
        assert_eq!(e.answer, "first");
        assert_eq!(s, 1.0);
    }

    // ---- close_matches ----

    #[test]
    fn test_close_matches_ordered_and_limited() {
        let kb = vec![
            entry("T", "training"),
            entry("T", "training plan"),
            entry("T", "training plan steps"),
            entry("T", "train"),
            entry("X", "zzzz"),
        ];
        let close = close_matches("training plan", &kb, 0.4, 3);
        assert_eq!(close.len(), 3);
        assert_eq!(close[0].0.question, "training plan");
        assert!(close[0].1 >= close[1].1);
        assert!(close[1].1 >= close[2].1);
        assert!(close.iter().all(|(e, _)| e.question != "zzzz"));
    }

    #[test]
    fn test_close_matches_respects_cutoff() {
        let kb = vec![entry("T", "abc"), entry("T", "xyz")];
        let close = close_matches("abc", &kb, 0.4, 3);
        assert_eq!(close.len(), 1);
    }

    #[test]
    fn test_close_matches_stable_on_ties() {
        let kb = vec![
            KnowledgeEntry::new("A", "dup", "1"),
            KnowledgeEntry::new("B", "dup", "2"),
        ];
        let close = close_matches("dup", &kb, 0.4, 3);
        assert_eq!(close[0].0.answer, "1");
        assert_eq!(close[1].0.answer, "2");
    }

    // ---- classify ----

    #[test]
    fn test_classify_identical_question_is_exact() {
        let kb = vec![KnowledgeEntry::new(
            "Policy",
            "What does NSPM-33 require?",
            "X",
        )];
        match engine().classify("What does NSPM-33 require?", &kb, &kb) {
            MatchResult::Exact { entry, score } => {
                assert_eq!(entry.answer, "X");
                assert_eq!(score, 1.0);
            }
            other => panic!("expected Exact, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_near_phrasing_never_no_match() {
        let kb = vec![
            entry("Export Control", "Technology Control Plan steps"),
            entry("Training", "Training requirements"),
        ];
        let result = engine().classify("technology control steps", &kb, &kb);
        match result {
            MatchResult::Exact { entry, .. } => {
                assert_eq!(entry.question, "Technology Control Plan steps")
            }
            MatchResult::Ambiguous { candidates, .. } => assert!(candidates
                .iter()
                .any(|c| c.question == "Technology Control Plan steps")),
            other => panic!("expected Exact or Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_empty_base_is_no_match() {
        for query in ["anything", "What does NSPM-33 require?", ""] {
            assert_eq!(engine().classify(query, &[], &[]), MatchResult::NoMatch);
        }
    }

    #[test]
    fn test_classify_blank_query_is_no_match() {
        let kb = research_kb();
        assert_eq!(engine().classify("   \t", &kb, &kb), MatchResult::NoMatch);
    }

    #[test]
    fn test_classify_mid_band_is_ambiguous() {
        // "training requirements for staff" vs "Training requirements":
        // 21 shared chars of 31 + 21 -> ~0.81.
        let kb = research_kb();
        match engine().classify("training requirements for staff", &kb, &kb) {
            MatchResult::Ambiguous {
                candidates,
                inferred_category,
            } => {
                assert_eq!(candidates[0].question, "Training requirements");
                assert_eq!(inferred_category, "Training");
                assert!(candidates.len() <= 3);
            }
            other => panic!("expected Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_miss_searches_globally() {
        let kb = research_kb();
        let filtered: Vec<KnowledgeEntry> = kb
            .iter()
            .filter(|e| e.category == "Disclosure")
            .cloned()
            .collect();
        match engine().classify("training requirements", &filtered, &kb) {
            MatchResult::Miss {
                fallback_candidates,
                inferred_category,
            } => {
                assert_eq!(fallback_candidates[0].question, "Training requirements");
                assert_eq!(inferred_category.as_deref(), Some("Training"));
            }
            other => panic!("expected Miss, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_unrelated_is_no_match() {
        let kb = vec![entry("T", "abc")];
        assert_eq!(engine().classify("xyz", &kb, &kb), MatchResult::NoMatch);
    }

    #[test]
    fn test_classify_miss_blank_category_is_none() {
        let kb = vec![entry("", "export control basics")];
        let filtered = vec![entry("Other", "zzzzzzzzzzzzzzzzzz")];
        match engine().classify("export control", &filtered, &kb) {
            MatchResult::Miss {
                inferred_category, ..
            } => assert!(inferred_category.is_none()),
            other => panic!("expected Miss, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_respects_configured_limit() {
        let engine = MatchEngine::new(MatchConfig {
            max_suggestions: 1,
            ..MatchConfig::default()
        });
        let kb = vec![
            entry("T", "training plan one"),
            entry("T", "training plan two"),
        ];
        let filtered = vec![entry("X", "qqqqqqqqqqqqqqqq")];
        let result = engine.classify("training plan", &filtered, &kb);
        assert_eq!(result.kind(), "miss");
        assert_eq!(result.suggestions().len(), 1);
    }

    #[test]
    fn test_classify_in_uses_category_filter() {
        let kb = KnowledgeBase::new(research_kb());
        let result = engine().classify_in("training requirements", &kb, "Disclosure");
        assert_eq!(result.kind(), "miss");

        let result = engine().classify_in("training requirements", &kb, "Training");
        assert_eq!(result.kind(), "exact");
    }

    #[test]
    fn test_classify_in_unknown_category_uses_whole_base() {
        let kb = KnowledgeBase::new(research_kb());
        let result = engine().classify_in("training requirements", &kb, "Finance");
        assert_eq!(result.kind(), "exact");
    }

    #[test]
    fn test_match_result_suggestions_accessor() {
        assert!(MatchResult::NoMatch.suggestions().is_empty());
        let r = MatchResult::Ambiguous {
            candidates: vec![entry("T", "q")],
            inferred_category: "T".to_string(),
        };
        assert_eq!(r.suggestions().len(), 1);
        assert_eq!(r.kind(), "ambiguous");
    }
    // ---- Threshold boundaries ----

    fn next_up(x: f32) -> f32 {
        f32::from_bits(x.to_bits() + 1)
    }

    fn tcp_kb() -> Vec<KnowledgeEntry> {
        vec![entry("Export Control", "Technology Control Plan steps")]
    }

    const TCP_QUERY: &str = "technology control steps";

    #[test]
    fn test_exact_threshold_is_inclusive() {
        let kb = tcp_kb();
        let s = score(TCP_QUERY, &kb[0].question);
        assert!((s - 48.0 / 53.0).abs() < 1e-4);

        let at = MatchEngine::new(MatchConfig {
            exact_threshold: s,
            ..MatchConfig::default()
        });
        assert_eq!(at.classify(TCP_QUERY, &kb, &kb).kind(), "exact");

        let above = MatchEngine::new(MatchConfig {
            exact_threshold: next_up(s),
            ..MatchConfig::default()
        });
        assert_eq!(above.classify(TCP_QUERY, &kb, &kb).kind(), "ambiguous");
    }

    #[test]
    fn test_ambiguous_threshold_is_inclusive() {
        let kb = tcp_kb();
        let s = score(TCP_QUERY, &kb[0].question);

        let at = MatchEngine::new(MatchConfig {
            exact_threshold: 0.95,
            ambiguous_threshold: s,
            ..MatchConfig::default()
        });
        assert_eq!(at.classify(TCP_QUERY, &kb, &kb).kind(), "ambiguous");

        let above = MatchEngine::new(MatchConfig {
            exact_threshold: 0.95,
            ambiguous_threshold: next_up(s),
            ..MatchConfig::default()
        });
        assert_eq!(above.classify(TCP_QUERY, &kb, &kb).kind(), "miss");
    }

    // ---- Query length bound ----

    const TRAINING_Q: &str = "How do I complete training?";

    fn bounded_engine(max_query_chars: usize) -> MatchEngine {
        MatchEngine::new(MatchConfig {
            max_query_chars,
            ..MatchConfig::default()
        })
    }

    fn exact_score(result: MatchResult) -> f32 {
        match result {
            MatchResult::Exact { score, .. } => score,
            other => panic!("expected Exact, got {:?}", other),
        }
    }

    #[test]
    fn test_query_below_limit_scored_whole() {
        let kb = vec![entry("Training", TRAINING_Q)];
        let query = &TRAINING_Q[..TRAINING_Q.len() - 1];
        let limit = query.chars().count() + 1;
        let s = exact_score(bounded_engine(limit).classify(query, &kb, &kb));
        assert_eq!(s, score(query, TRAINING_Q));
        assert!(s < 1.0);
    }

    #[test]
    fn test_query_at_limit_scored_whole() {
        let kb = vec![entry("Training", TRAINING_Q)];
        let limit = TRAINING_Q.chars().count();
        let s = exact_score(bounded_engine(limit).classify(TRAINING_Q, &kb, &kb));
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_query_over_limit_is_truncated() {
        let kb = vec![entry("Training", TRAINING_Q)];
        let limit = TRAINING_Q.chars().count();
        let query = format!("{}!", TRAINING_Q);
        assert!(score(&query, TRAINING_Q) < 1.0);
        let s = exact_score(bounded_engine(limit).classify(&query, &kb, &kb));
        assert_eq!(s, 1.0);

        let kb = KnowledgeBase::new(kb);
        let s = exact_score(bounded_engine(limit).classify_in(&query, &kb, "Training"));
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_bounded_respects_char_boundaries() {
        assert_eq!(bounded("ééé", 2), "éé");
        assert_eq!(bounded("abc", 3), "abc");
        assert_eq!(bounded("abc", 10), "abc");
    }

    #[test]
    fn test_very_long_query_is_bounded() {
        let kb = KnowledgeBase::new(research_kb());
        let query = "how do i complete training ".repeat(4000);
        let started = std::time::Instant::now();
        let result = engine().classify_in(&query, &kb, "all");
        assert_eq!(result, MatchResult::NoMatch);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    // ---- Single scoring pass ----

    #[test]
    fn test_classify_in_matches_classify_on_filtered_slices() {
        let kb = KnowledgeBase::new(research_kb());
        for (query, category) in [
            ("training requirements for staff", "all"),
            ("training requirements", "Disclosure"),
            ("technology control plan", "Policy"),
            ("zzzz", "Training"),
            ("training requirements", "Finance"),
        ] {
            let filtered = kb.filter_by_category(category);
            assert_eq!(
                engine().classify_in(query, &kb, category),
                engine().classify(query, &filtered, kb.entries()),
                "{} / {}",
                query,
                category
            );
        }
    }
}
