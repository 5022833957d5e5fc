// src/address/admin_name.rs - Splitting reference names into base and qualifier words
use crate::address::normalizer::normalize;

/// A reference name such as "Mavala (New)" split into its base ("mavala") and the
/// qualifier words that appeared inside parentheses ("new").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNameParts {
    pub base_name: String,
    pub qualifiers: Vec<String>,
}

pub fn parse_admin_name(name: &str) -> AdminNameParts {
    let lower = name.to_lowercase();
    let normalized = normalize(name);
    let mut qualifiers = Vec::new();
    let mut base_parts = Vec::new();

    for word in normalized.split_whitespace() {
        if lower.contains(&format!("({})", word)) {
            if !qualifiers.iter().any(|q| q == word) {
                qualifiers.push(word.to_string());
            }
        } else {
            base_parts.push(word);
        }
    }

    AdminNameParts {
        base_name: base_parts.join(" "),
        qualifiers,
    }
}

pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_name_with_qualifier() {
        let parts = parse_admin_name("Mavala (New)");
        assert_eq!(parts.base_name, "mavala");
        assert_eq!(parts.qualifiers, vec!["new"]);
    }

    #[test]
    fn test_parse_admin_name_keeps_multi_word_base() {
        let parts = parse_admin_name("Kottha Pally (Rural) (New)");
        assert_eq!(parts.base_name, "kottha pally");
        assert_eq!(parts.qualifiers, vec!["rural".to_string(), "new".to_string()]);
    }

    #[test]
    fn test_parse_admin_name_without_qualifier() {
        let parts = parse_admin_name("Adilabad Rural");
        assert_eq!(parts.base_name, "adilabad rural");
        assert!(parts.qualifiers.is_empty());
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("adilabad rural"), "Adilabad Rural");
        assert_eq!(capitalize_words("mavala"), "Mavala");
        assert_eq!(capitalize_words(""), "");
    }
}
