// src/matching/similarity.rs
use strsim::levenshtein;

/// Minimum similarity for an approximate match, used by every resolver.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.90;

/// Normalized edit-distance similarity in [0, 1]. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

pub fn is_fuzzy_match(a: &str, b: &str) -> bool {
    similarity(a, b) >= FUZZY_MATCH_THRESHOLD
}
