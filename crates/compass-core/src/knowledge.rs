//! The FAQ knowledge base: loading, category filtering, and snapshot reloads.
//!
//! The base is immutable after load. Hosts that reload it at runtime go
//! through [`KnowledgeStore`], which swaps whole snapshots so readers never
//! see a partially replaced table.

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{CompassError, Result};
use crate::types::KnowledgeEntry;

/// Category value that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Lowercase and collapse surrounding whitespace for category comparison.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Whether a category filter selects the whole base.
///
/// Accepts `all` and the UI label `All Categories` in any casing, as well as
/// an empty filter.
pub fn is_all_categories(category: &str) -> bool {
    let normalized = normalize_category(category);
    normalized.is_empty() || normalized == ALL_CATEGORIES || normalized == "all categories"
}

/// Whether two category filters select the same entries.
pub fn same_category(a: &str, b: &str) -> bool {
    (is_all_categories(a) && is_all_categories(b)) || normalize_category(a) == normalize_category(b)
}

// =============================================================================
// KnowledgeBase
// =============================================================================

/// Ordered, read-only collection of FAQ entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct categories in first-seen order, blank categories skipped.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for entry in &self.entries {
            let category = entry.category.trim();
            if category.is_empty() {
                continue;
            }
            if !seen.iter().any(|c| same_category(c, category)) {
                seen.push(category.to_string());
            }
        }
        seen
    }

    /// Entries belonging to `category`.
    ///
    /// The `all` sentinel and any category that matches no entry both yield
    /// the whole base, so a filter never silently produces an empty set.
    pub fn filter_by_category(&self, category: &str) -> Vec<KnowledgeEntry> {
        if is_all_categories(category) {
            return self.entries.clone();
        }
        let wanted = normalize_category(category);
        let filtered: Vec<KnowledgeEntry> = self
            .entries
            .iter()
            .filter(|e| normalize_category(&e.category) == wanted)
            .cloned()
            .collect();
        if filtered.is_empty() {
            tracing::debug!(category, "Category matched no entries; using full knowledge base");
            self.entries.clone()
        } else {
            filtered
        }
    }

    /// Parse a CSV table with `Category, Question, Answer` headers.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for required in ["Category", "Question", "Answer"] {
            if !headers.iter().any(|h| h == required) {
                return Err(CompassError::DataSource(format!(
                    "missing required column: {}",
                    required
                )));
            }
        }

        let mut entries = Vec::new();
        for record in csv_reader.deserialize::<KnowledgeEntry>() {
            entries.push(record?);
        }
        Ok(Self::new(entries))
    }

    /// Parse a JSON array of `{Category, Question, Answer}` objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Rows(Vec<KnowledgeEntry>);

        let rows: Rows = serde_json::from_str(json)?;
        Ok(Self::new(rows.0))
    }

    /// Load from a file, choosing the format by extension (`.json` or CSV).
    pub fn try_load(path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let kb = if is_json {
            let content = std::fs::read_to_string(path).map_err(|e| {
                CompassError::DataSource(format!("{}: {}", path.display(), e))
            })?;
            Self::from_json_str(&content)?
        } else {
            let file = std::fs::File::open(path).map_err(|e| {
                CompassError::DataSource(format!("{}: {}", path.display(), e))
            })?;
            Self::from_csv_reader(file)?
        };

        info!(
            path = %path.display(),
            entries = kb.len(),
            categories = kb.categories().len(),
            "Knowledge base loaded"
        );
        Ok(kb)
    }
}

impl From<Vec<KnowledgeEntry>> for KnowledgeBase {
    fn from(entries: Vec<KnowledgeEntry>) -> Self {
        Self::new(entries)
    }
}

/// Load the knowledge base, degrading to an empty table on any failure.
pub fn load_knowledge_base(path: &Path) -> KnowledgeBase {
    match KnowledgeBase::try_load(path) {
        Ok(kb) => kb,
        Err(e) => {
            warn!(
                "Knowledge base unavailable at {}: {}. Continuing with an empty table.",
                path.display(),
                e
            );
            KnowledgeBase::default()
        }
    }
}

// =============================================================================
// KnowledgeStore
// =============================================================================

/// Holder for the current knowledge base snapshot.
///
/// Readers clone the `Arc` and keep using their snapshot even if a reload
/// replaces it mid-conversation.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    current: RwLock<Arc<KnowledgeBase>>,
}

impl KnowledgeStore {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            current: RwLock::new(Arc::new(kb)),
        }
    }

    /// The current snapshot. A poisoned lock still yields the last snapshot.
    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&self, kb: KnowledgeBase) -> Arc<KnowledgeBase> {
        let next = Arc::new(kb);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        info!(entries = next.len(), "Knowledge base snapshot replaced");
        std::mem::replace(&mut *guard, next)
    }

    /// Reload from disk. On failure the current snapshot is kept.
    pub fn reload(&self, path: &Path) -> Result<usize> {
        let kb = KnowledgeBase::try_load(path)?;
        let count = kb.len();
        self.replace(kb);
        Ok(count)
    }
}
