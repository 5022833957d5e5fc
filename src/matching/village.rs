// src/matching/village.rs - Village detection, scoped to a mandal or across a district
use log::debug;
use std::sync::Arc;

use crate::address::normalizer::extract_tokens;
use crate::address::phonetic::{fold_normalized, phonetic_fold};
use crate::error::ResolveError;
use crate::hierarchy::store::HierarchyStore;
use crate::matching::decision::{decide, CandidateSet};
use crate::matching::policy::MatchPolicy;
use crate::matching::similarity::is_fuzzy_match;
use crate::models::hierarchy::{District, Mandal, NameKey, Village};
use crate::models::verdict::DetectionVerdict;

/// Tokens shorter than this never take part in equality, containment or fuzzy checks.
pub const MIN_VILLAGE_TOKEN_LEN: usize = 5;

const VILLAGE_STOP_WORDS: [&str; 5] = ["city", "district", "dist", "block", "mandal"];

/// Longest run of address tokens compared against a full village name.
const MAX_PHRASE_TOKENS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchTier {
    Exact,
    Fuzzy,
}

/// Folded address tokens prepared once per address.
struct VillageTokens {
    /// In address order, used for multi-word phrase matching.
    ordered: Vec<String>,
    /// Long enough for per-token comparison.
    candidates: Vec<String>,
}

impl VillageTokens {
    fn new(district_name: &str, address: &str) -> Self {
        let folded_district = fold_normalized(district_name);
        let ordered: Vec<String> = extract_tokens(address)
            .iter()
            .map(|t| phonetic_fold(t))
            .filter(|t| *t != folded_district)
            .filter(|t| !VILLAGE_STOP_WORDS.contains(&t.as_str()))
            .collect();
        let candidates = ordered
            .iter()
            .filter(|t| t.len() >= MIN_VILLAGE_TOKEN_LEN)
            .cloned()
            .collect();
        Self {
            ordered,
            candidates,
        }
    }
}

/// True when one to three consecutive tokens, joined by single spaces, equal `target`.
pub(crate) fn phrase_matches<S: AsRef<str>>(tokens: &[S], target: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    (1..=MAX_PHRASE_TOKENS).any(|width| {
        tokens.windows(width).any(|window| {
            let phrase: Vec<&str> = window.iter().map(|t| t.as_ref()).collect();
            phrase.join(" ") == target
        })
    })
}

fn contains_either_way(token: &str, target: &str) -> bool {
    let (longer, shorter) = if token.len() >= target.len() {
        (token, target)
    } else {
        (target, token)
    };
    shorter.len() >= MIN_VILLAGE_TOKEN_LEN && longer.contains(shorter)
}

pub struct VillageDetector {
    store: Arc<dyn HierarchyStore>,
    policy: MatchPolicy,
}

impl VillageDetector {
    pub fn new(store: Arc<dyn HierarchyStore>, policy: MatchPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    fn district(&self, district_name: &str) -> Result<Arc<District>, ResolveError> {
        self.store
            .get_hierarchy(district_name)
            .ok_or_else(|| ResolveError::DistrictNotFound(district_name.to_string()))
    }

    fn match_village(&self, village: &Village, tokens: &VillageTokens) -> Option<MatchTier> {
        let targets: Vec<&NameKey> = std::iter::once(&village.key)
            .chain(village.alias_key.as_ref())
            .collect();

        // Single-word names only go through the length-filtered token checks below.
        if self.policy.phrase_matching
            && targets
                .iter()
                .any(|k| k.folded.contains(' ') && phrase_matches(&tokens.ordered, &k.folded))
        {
            return Some(MatchTier::Exact);
        }

        let exact = tokens.candidates.iter().any(|token| {
            targets.iter().any(|k| {
                *token == k.folded
                    || (self.policy.substring_matching && contains_either_way(token, &k.folded))
            })
        });
        if exact {
            return Some(MatchTier::Exact);
        }

        let fuzzy = tokens
            .candidates
            .iter()
            .any(|token| targets.iter().any(|k| is_fuzzy_match(token, &k.folded)));
        fuzzy.then_some(MatchTier::Fuzzy)
    }

    fn collect_matches<'a>(
        &self,
        villages: impl Iterator<Item = &'a Village>,
        tokens: &VillageTokens,
        exact: &mut CandidateSet,
        fuzzy: &mut CandidateSet,
    ) {
        for village in villages.filter(|v| !v.is_mandal_headquarters) {
            match self.match_village(village, tokens) {
                Some(MatchTier::Exact) => exact.push(&village.name),
                Some(MatchTier::Fuzzy) => fuzzy.push(&village.name),
                None => {}
            }
        }
    }

    /// Village verdict within one mandal. The mandal's headquarters village is returned
    /// only when no other village matched at all, and never for an address without
    /// usable tokens.
    pub fn detect_village(
        &self,
        district_name: &str,
        mandal_name: &str,
        address: &str,
    ) -> Result<DetectionVerdict, ResolveError> {
        if district_name.trim().is_empty() || mandal_name.trim().is_empty() || address.trim().is_empty()
        {
            return Ok(DetectionVerdict::NotFound);
        }
        let district = self.district(district_name)?;
        Ok(self.detect_village_in(&district, mandal_name, address))
    }

    pub fn detect_village_in(
        &self,
        district: &District,
        mandal_name: &str,
        address: &str,
    ) -> DetectionVerdict {
        let Some(mandal) = district.find_mandal(mandal_name) else {
            debug!("Mandal '{}' not in {}, no village scan", mandal_name, district.name);
            return DetectionVerdict::NotFound;
        };
        self.detect_in_mandal(district, mandal, address)
    }

    fn detect_in_mandal(&self, district: &District, mandal: &Mandal, address: &str) -> DetectionVerdict {
        let tokens = VillageTokens::new(&district.name, address);
        if tokens.ordered.is_empty() {
            return DetectionVerdict::NotFound;
        }

        let mut exact = CandidateSet::new();
        let mut fuzzy = CandidateSet::new();
        self.collect_matches(mandal.villages.iter(), &tokens, &mut exact, &mut fuzzy);

        debug!(
            "Village tokens {:?} in mandal {}: exact={:?} fuzzy={:?}",
            tokens.ordered,
            mandal.name,
            exact.as_slice(),
            fuzzy.as_slice()
        );

        let fallback = mandal.headquarters_village().map(|v| v.name.clone());
        decide(exact, fuzzy, fallback)
    }

    /// Village verdict over every mandal of the district. Headquarters villages are left
    /// out and there is no fallback.
    pub fn detect_village_across_district(
        &self,
        district_name: &str,
        address: &str,
    ) -> Result<DetectionVerdict, ResolveError> {
        if district_name.trim().is_empty() || address.trim().is_empty() {
            return Ok(DetectionVerdict::NotFound);
        }
        let district = self.district(district_name)?;
        Ok(self.detect_across_in(&district, address))
    }

    pub fn detect_across_in(&self, district: &District, address: &str) -> DetectionVerdict {
        let tokens = VillageTokens::new(&district.name, address);
        if tokens.ordered.is_empty() {
            return DetectionVerdict::NotFound;
        }

        let mut exact = CandidateSet::new();
        let mut fuzzy = CandidateSet::new();
        let villages = district.mandals.iter().flat_map(|m| m.villages.iter());
        self.collect_matches(villages, &tokens, &mut exact, &mut fuzzy);

        debug!(
            "District-wide village tokens {:?} in {}: exact={:?} fuzzy={:?}",
            tokens.ordered,
            district.name,
            exact.as_slice(),
            fuzzy.as_slice()
        );

        decide(exact, fuzzy, None)
    }

    /// Mandals, in hierarchy order, holding a village whose name or alias folds to the
    /// same text as `village_name`.
    pub fn find_mandals_by_village(
        &self,
        district_name: &str,
        village_name: &str,
    ) -> Result<Vec<String>, ResolveError> {
        let district = self.district(district_name)?;
        Ok(Self::find_mandals_by_village_in(&district, village_name))
    }

    pub fn find_mandals_by_village_in(district: &District, village_name: &str) -> Vec<String> {
        let folded_query = fold_normalized(village_name);
        if folded_query.is_empty() {
            return Vec::new();
        }
        district
            .mandals
            .iter()
            .filter(|m| m.villages.iter().any(|v| v.answers_to(&folded_query)))
            .map(|m| m.name.clone())
            .collect()
    }
}
