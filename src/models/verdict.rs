// src/models/verdict.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which level of the hierarchy a verdict talks about. Only used for labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminLevel {
    Mandal,
    Village,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionStatus {
    Single,
    Multiple,
    NotFound,
    MultipleDistricts,
}

impl DetectionStatus {
    /// Stable status label used in JSON output and reports, e.g. `SINGLE_MANDAL`.
    pub fn label(&self, level: AdminLevel) -> &'static str {
        match (self, level) {
            (DetectionStatus::Single, AdminLevel::Mandal) => "SINGLE_MANDAL",
            (DetectionStatus::Multiple, AdminLevel::Mandal) => "MULTIPLE_MANDALS",
            (DetectionStatus::NotFound, AdminLevel::Mandal) => "MANDAL_NOT_FOUND",
            (DetectionStatus::MultipleDistricts, _) => "MULTIPLE_DISTRICTS",
            (DetectionStatus::Single, AdminLevel::Village) => "SINGLE_VILLAGE",
            (DetectionStatus::Multiple, AdminLevel::Village) => "MULTIPLE_VILLAGES",
            (DetectionStatus::NotFound, AdminLevel::Village) => "VILLAGE_NOT_FOUND",
        }
    }
}

/// Outcome of one detection stage. Exactly one case holds; consumers match on it instead
/// of probing nullable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "candidates", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionVerdict {
    Single(String),
    Multiple(Vec<String>),
    NotFound,
    /// Mandal-only: the address names mandals in more than one district.
    MultipleDistricts(Vec<String>),
}

impl DetectionVerdict {
    pub fn status(&self) -> DetectionStatus {
        match self {
            DetectionVerdict::Single(_) => DetectionStatus::Single,
            DetectionVerdict::Multiple(_) => DetectionStatus::Multiple,
            DetectionVerdict::NotFound => DetectionStatus::NotFound,
            DetectionVerdict::MultipleDistricts(_) => DetectionStatus::MultipleDistricts,
        }
    }

    pub fn resolved_name(&self) -> Option<&str> {
        match self {
            DetectionVerdict::Single(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn candidates(&self) -> Option<&[String]> {
        match self {
            DetectionVerdict::Multiple(names) | DetectionVerdict::MultipleDistricts(names) => {
                Some(names.as_slice())
            }
            _ => None,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, DetectionVerdict::Single(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DetectionVerdict::NotFound)
    }
}

impl fmt::Display for DetectionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionVerdict::Single(name) => write!(f, "single({})", name),
            DetectionVerdict::Multiple(names) => write!(f, "multiple({})", names.join(", ")),
            DetectionVerdict::NotFound => write!(f, "not_found"),
            DetectionVerdict::MultipleDistricts(names) => {
                write!(f, "multiple_districts({})", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_accessors() {
        let single = DetectionVerdict::Single("Ichoda".to_string());
        assert_eq!(single.resolved_name(), Some("Ichoda"));
        assert!(single.candidates().is_none());
        assert_eq!(single.status().label(AdminLevel::Mandal), "SINGLE_MANDAL");

        let multiple = DetectionVerdict::Multiple(vec!["Bela".into(), "Ichoda".into()]);
        assert_eq!(multiple.resolved_name(), None);
        assert_eq!(multiple.candidates().map(|c| c.len()), Some(2));
        assert_eq!(multiple.status().label(AdminLevel::Village), "MULTIPLE_VILLAGES");

        assert!(DetectionVerdict::NotFound.is_not_found());
        assert_eq!(
            DetectionVerdict::NotFound.status().label(AdminLevel::Village),
            "VILLAGE_NOT_FOUND"
        );
    }
}
