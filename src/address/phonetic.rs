// src/address/phonetic.rs
use crate::address::normalizer::normalize;

/// Transliteration folds applied in order. Tuned together with the 0.90 fuzzy threshold,
/// so changes here shift every match decision.
pub const FOLD_RULES: [(&str, &str); 2] = [("oo", "u"), ("oor", "ur")];

/// Collapses common spelling variants of the same place name ("Muthnoor" / "Muthnur").
/// Operates on already-normalized text.
pub fn phonetic_fold(text: &str) -> String {
    FOLD_RULES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

pub fn fold_normalized(raw: &str) -> String {
    phonetic_fold(&normalize(raw))
}
