// src/address/normalizer.rs - Address text cleanup and meaningful token extraction
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub const MIN_TOKEN_LENGTH: usize = 2;

/// Label and noise words that never identify a place. Kept small on purpose: anything
/// added here can no longer match a village or mandal.
pub const LABEL_STOP_WORDS: [&str; 37] = [
    // address structure labels
    "flat", "floor", "no", "dno", "doorno", "door", "house", "hno", "building", "bldg",
    "apartment", "apt", "plot",
    // road and locator labels
    "road", "rd", "street", "st", "lane", "ln", "colony", "near", "beside", "behind", "opp",
    "opposite", "area", "locality",
    // administrative labels
    "village", "vill", "town", "city", "block", "blk", "dist", "district", "mandal", "mdl",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| LABEL_STOP_WORDS.iter().copied().collect());

// Structured registration forms carry "Road/Street:-" style labels.
static STRUCTURED_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"road\s*/\s*street\s*:-?").unwrap());
static STRUCTURED_ROAD_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"road\s*/\s*street\s*:-?\s*[^,]+").unwrap());
static STRUCTURED_LABELS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(flat\s*no|building|village/town|block|city)\s*:-?").unwrap()
});
static ROAD_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(road|street|lane|rd|st|colony|area|block)\b").unwrap());
static BRACKET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([a-z]+\)").unwrap());
static HOUSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(h\.?no|d\.?no|plot|flat)\b\s*[:\-]?\s*\w+").unwrap());
static NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").unwrap());

/// Lowercases, turns brackets and every character outside `[a-z0-9 ]` into a space,
/// collapses whitespace and trims. Idempotent.
pub fn normalize(raw: &str) -> String {
    let spaced: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}

/// Strips the parts of a raw address that look like place names but are not: the value of
/// a structured road/street field, bare road words, `(V)`/`(H)` markers and house or plot
/// numbers. Digits and punctuation are dropped entirely.
pub fn clean_raw_address(raw: &str) -> String {
    let mut lower = raw.to_lowercase();

    if STRUCTURED_FORM.is_match(&lower) {
        lower = STRUCTURED_ROAD_VALUE.replace_all(&lower, " ").into_owned();
        lower = STRUCTURED_LABELS.replace_all(&lower, " ").into_owned();
    } else {
        lower = ROAD_WORDS.replace_all(&lower, " ").into_owned();
        lower = BRACKET_MARKER.replace_all(&lower, " ").into_owned();
    }

    lower = HOUSE_NUMBER.replace_all(&lower, " ").into_owned();
    lower = NON_LETTERS.replace_all(&lower, " ").into_owned();
    lower.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ordered meaningful tokens of an address: cleaned, normalized, label words removed,
/// single characters and pure numbers dropped. Duplicates are kept so that phrase
/// matching sees the address as written.
pub fn extract_tokens(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let normalized = normalize(&clean_raw_address(raw));
    let tokens: Vec<String> = normalized
        .split_whitespace()
        .filter(|t| !is_stop_word(t))
        .filter(|t| t.len() >= MIN_TOKEN_LENGTH)
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    debug!("Extracted tokens {:?} from address '{}'", tokens, raw);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_brackets() {
        assert_eq!(normalize("Door No. 12-4, (V) Ichoda  "), "door no 12 4 v ichoda");
        assert_eq!(normalize("Mavala (New)"), "mavala new");
        assert_eq!(normalize("  \t\n "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "H.No 5-6, Gandhi Road, Mallapur (V), Ichoda Mandal",
            "Flat No:- 12, Road/Street:- Gandhi Road",
            "Ädilabad — Tëst [x] {y}",
            "already clean text",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_extract_tokens_drops_labels_numbers_and_short_tokens() {
        assert_eq!(
            extract_tokens("door no 12 ichoda village adilabad district"),
            vec!["ichoda", "adilabad"]
        );
        assert_eq!(extract_tokens("x 7 y 99"), Vec::<String>::new());
        assert!(extract_tokens("   ").is_empty());
    }

    #[test]
    fn test_free_text_cleanup_removes_road_words_and_markers() {
        let tokens = extract_tokens("H.No 5-6, Gandhi Road, Mallapur (V), Ichoda Mandal");
        assert_eq!(tokens, vec!["gandhi", "mallapur", "ichoda"]);
    }

    #[test]
    fn test_structured_form_drops_road_value_and_keeps_labelled_values() {
        let raw = "Flat No:- 12, Building:- Sai Residency, Road/Street:- Gandhi Road, \
                   Village/Town:- Ichoda, Block:- x, City:- Adilabad";
        let tokens = extract_tokens(raw);
        assert_eq!(tokens, vec!["sai", "residency", "ichoda", "adilabad"]);
        assert!(!tokens.contains(&"gandhi".to_string()));
    }

    #[test]
    fn test_duplicate_tokens_are_preserved_in_order() {
        assert_eq!(
            extract_tokens("muthnoor building muthnoor town indervelly"),
            vec!["muthnoor", "muthnoor", "indervelly"]
        );
    }
}
