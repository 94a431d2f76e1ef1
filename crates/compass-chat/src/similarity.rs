//! Character-level string similarity.

use similar::{Algorithm, TextDiff};

/// Case-insensitive similarity ratio in `[0, 1]`.
///
/// Computed as `2 * M / (|a| + |b|)` over characters, where `M` is the
/// number of characters in the matching blocks of a minimal diff between the
/// two lowercased strings. Identical text scores `1.0`; the measure is
/// symmetric because a minimal diff keeps the same number of characters in
/// either direction. Two empty strings score `1.0`.
pub fn score(a: &str, b: &str) -> f32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }
    TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(a.as_str(), b.as_str())
        .ratio()
}
