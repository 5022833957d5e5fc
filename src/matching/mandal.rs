// src/matching/mandal.rs - Mandal detection from a free-text address
use log::debug;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::address::normalizer::extract_tokens;
use crate::address::phonetic::{fold_normalized, phonetic_fold};
use crate::error::ResolveError;
use crate::hierarchy::store::HierarchyStore;
use crate::matching::decision::{decide, CandidateSet};
use crate::matching::similarity::is_fuzzy_match;
use crate::models::hierarchy::{District, Mandal, NameKey};
use crate::models::verdict::DetectionVerdict;

/// Dropped on top of the normalizer's label words before mandal matching.
pub const MANDAL_EXTRA_STOP_WORDS: [&str; 7] =
    ["city", "district", "town", "village", "block", "road", "street"];

enum MandalHit {
    Exact,
    Fuzzy,
}

pub struct MandalDetector {
    store: Arc<dyn HierarchyStore>,
}

/// Folded tokens that may name a mandal. The district's own name is removed.
pub(crate) fn mandal_tokens(district_name: &str, address: &str) -> BTreeSet<String> {
    let folded_district = fold_normalized(district_name);
    extract_tokens(address)
        .iter()
        .map(|t| phonetic_fold(t))
        .filter(|t| *t != folded_district)
        .filter(|t| !MANDAL_EXTRA_STOP_WORDS.contains(&t.as_str()))
        .collect()
}

fn all_words_present(key: &NameKey, tokens: &BTreeSet<String>) -> bool {
    let mut words = key.folded_words().peekable();
    words.peek().is_some() && words.all(|w| tokens.contains(w))
}

fn match_mandal(mandal: &Mandal, tokens: &BTreeSet<String>) -> Option<MandalHit> {
    // the alias is one folded string, never assembled from separate words
    let alias_present = mandal
        .alias_key
        .as_ref()
        .map_or(false, |alias| tokens.contains(&alias.folded));
    if all_words_present(&mandal.key, tokens) || alias_present {
        return Some(MandalHit::Exact);
    }

    let fuzzy = tokens.iter().any(|token| {
        mandal.key.folded_words().any(|w| is_fuzzy_match(token, w))
            || mandal
                .alias_key
                .as_ref()
                .map_or(false, |alias| is_fuzzy_match(token, &alias.folded))
    });
    fuzzy.then_some(MandalHit::Fuzzy)
}

impl MandalDetector {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self { store }
    }

    /// Mandal verdict for `address` within `district_name`. Only an unknown district is
    /// an error; an address with nothing usable is `NotFound`.
    pub fn detect_mandal(
        &self,
        district_name: &str,
        address: &str,
    ) -> Result<DetectionVerdict, ResolveError> {
        if district_name.trim().is_empty() || address.trim().is_empty() {
            return Ok(DetectionVerdict::NotFound);
        }
        if mandal_tokens(district_name, address).is_empty() {
            return Ok(DetectionVerdict::NotFound);
        }

        let district = self
            .store
            .get_hierarchy(district_name)
            .ok_or_else(|| ResolveError::DistrictNotFound(district_name.to_string()))?;
        Ok(Self::detect_mandal_in(&district, address))
    }

    pub fn detect_mandal_in(district: &District, address: &str) -> DetectionVerdict {
        let tokens = mandal_tokens(&district.name, address);
        if tokens.is_empty() {
            return DetectionVerdict::NotFound;
        }

        let mut exact = CandidateSet::new();
        let mut fuzzy = CandidateSet::new();
        let mut hq_exact: Option<String> = None;
        let mut hq_fuzzy: Option<String> = None;

        for mandal in &district.mandals {
            match (match_mandal(mandal, &tokens), mandal.is_headquarters) {
                (Some(MandalHit::Exact), false) => exact.push(&mandal.name),
                (Some(MandalHit::Fuzzy), false) => fuzzy.push(&mandal.name),
                (Some(MandalHit::Exact), true) => {
                    hq_exact.get_or_insert_with(|| mandal.name.clone());
                }
                (Some(MandalHit::Fuzzy), true) => {
                    hq_fuzzy.get_or_insert_with(|| mandal.name.clone());
                }
                (None, _) => {}
            }
        }

        debug!(
            "Mandal tokens {:?} in {}: exact={:?} fuzzy={:?} hq={:?}",
            tokens,
            district.name,
            exact.as_slice(),
            fuzzy.as_slice(),
            hq_exact.as_ref().or(hq_fuzzy.as_ref())
        );

        decide(exact, fuzzy, hq_exact.or(hq_fuzzy))
    }
}
