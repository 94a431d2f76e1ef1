pub mod config;
pub mod error;
pub mod knowledge;
pub mod types;

pub use config::{CategoryChangePolicy, CompassConfig, MatchConfig};
pub use error::{CompassError, Result};
pub use knowledge::{load_knowledge_base, KnowledgeBase, KnowledgeStore};
pub use types::*;
