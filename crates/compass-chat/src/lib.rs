//! Conversational FAQ interface for Compass.
//!
//! Provides fuzzy question matching, per-visitor session state, and
//! response composition over a static knowledge base.

pub mod assistant;
pub mod error;
pub mod fallback;
pub mod matcher;
pub mod response;
pub mod session;
pub mod similarity;

pub use assistant::Assistant;
pub use error::ChatError;
pub use fallback::{FallbackSource, StaticFallback};
pub use matcher::{best_match, close_matches, MatchEngine, MatchResult};
pub use response::ResponseComposer;
pub use session::{Session, SessionState};
pub use similarity::score;
