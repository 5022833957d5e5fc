// src/models/parse_result.rs
use serde::ser::{Serialize, Serializer};

use crate::models::verdict::{AdminLevel, DetectionVerdict};

/// Merged mandal and village verdicts for one address. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    mandal: DetectionVerdict,
    village: DetectionVerdict,
}

impl ParseResult {
    pub fn new(mandal: DetectionVerdict, village: DetectionVerdict) -> Self {
        Self { mandal, village }
    }

    pub fn not_found() -> Self {
        Self::new(DetectionVerdict::NotFound, DetectionVerdict::NotFound)
    }

    /// Mandal stage decided the outcome on its own; no village resolution was attempted.
    pub fn from_mandal_verdict(mandal: DetectionVerdict) -> Self {
        Self::new(mandal, DetectionVerdict::NotFound)
    }

    pub fn mandal(&self) -> &DetectionVerdict {
        &self.mandal
    }

    pub fn village(&self) -> &DetectionVerdict {
        &self.village
    }

    pub fn mandal_name(&self) -> Option<&str> {
        self.mandal.resolved_name()
    }

    pub fn village_name(&self) -> Option<&str> {
        self.village.resolved_name()
    }

    pub fn mandal_status_label(&self) -> &'static str {
        self.mandal.status().label(AdminLevel::Mandal)
    }

    pub fn village_status_label(&self) -> &'static str {
        self.village.status().label(AdminLevel::Village)
    }
}

/// A result together with the district it was resolved in, for lookups that also have to
/// locate the district.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LocatedParseResult {
    pub district: Option<String>,
    #[serde(flatten)]
    pub result: ParseResult,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseResultView<'a> {
    mandal_status: &'static str,
    mandal: Option<&'a str>,
    multiple_mandals: Option<&'a [String]>,
    village_status: &'static str,
    village: Option<&'a str>,
    multiple_villages: Option<&'a [String]>,
}

impl Serialize for ParseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ParseResultView {
            mandal_status: self.mandal_status_label(),
            mandal: self.mandal_name(),
            multiple_mandals: self.mandal.candidates(),
            village_status: self.village_status_label(),
            village: self.village_name(),
            multiple_villages: self.village.candidates(),
        }
        .serialize(serializer)
    }
}
