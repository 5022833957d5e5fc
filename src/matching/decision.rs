// src/matching/decision.rs - The exact -> fuzzy -> fallback ladder shared by both resolvers
use crate::models::verdict::DetectionVerdict;

/// Candidate names in first-seen order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    names: Vec<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }

    /// `Single` for one name, `Multiple` for several, `None` when empty.
    pub fn into_verdict(self) -> Option<DetectionVerdict> {
        match self.names.len() {
            0 => None,
            1 => self.names.into_iter().next().map(DetectionVerdict::Single),
            _ => Some(DetectionVerdict::Multiple(self.names)),
        }
    }
}

impl<'a> FromIterator<&'a str> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for name in iter {
            set.push(name);
        }
        set
    }
}

/// Exact matches win, then fuzzy matches, then the fallback. Callers only pass a fallback
/// when it may apply.
pub fn decide(
    exact: CandidateSet,
    fuzzy: CandidateSet,
    fallback: Option<String>,
) -> DetectionVerdict {
    exact
        .into_verdict()
        .or_else(|| fuzzy.into_verdict())
        .or_else(|| fallback.map(DetectionVerdict::Single))
        .unwrap_or(DetectionVerdict::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> CandidateSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_exact_outranks_fuzzy_and_fallback() {
        let verdict = decide(set(&["Ichoda"]), set(&["Bela"]), Some("Adilabad".into()));
        assert_eq!(verdict, DetectionVerdict::Single("Ichoda".into()));

        let verdict = decide(set(&["Ichoda", "Bela"]), set(&["Kadem"]), None);
        assert_eq!(
            verdict,
            DetectionVerdict::Multiple(vec!["Ichoda".into(), "Bela".into()])
        );
    }

    #[test]
    fn test_fuzzy_then_fallback_then_not_found() {
        assert_eq!(
            decide(set(&[]), set(&["Bela"]), Some("Adilabad".into())),
            DetectionVerdict::Single("Bela".into())
        );
        assert_eq!(
            decide(set(&[]), set(&[]), Some("Adilabad".into())),
            DetectionVerdict::Single("Adilabad".into())
        );
        assert_eq!(decide(set(&[]), set(&[]), None), DetectionVerdict::NotFound);
    }

    #[test]
    fn test_candidate_set_keeps_first_seen_order() {
        let names = set(&["Narsapur", "Khanapur", "Narsapur"]);
        assert_eq!(names.len(), 2);
        assert_eq!(names.into_vec(), vec!["Narsapur", "Khanapur"]);
    }
}
