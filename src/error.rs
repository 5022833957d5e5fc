// src/error.rs
use thiserror::Error;

/// Hard failures of the resolution engine. Ambiguous or missing matches are never
/// errors; they are reported through `DetectionVerdict`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("district not found in hierarchy store: {0}")]
    DistrictNotFound(String),

    #[error("malformed hierarchy for district {district}: {reason}")]
    MalformedHierarchy { district: String, reason: String },
}

impl ResolveError {
    pub fn malformed(district: &str, reason: impl Into<String>) -> Self {
        ResolveError::MalformedHierarchy {
            district: district.to_string(),
            reason: reason.into(),
        }
    }
}
