// src/service/address_parse.rs - Sequences mandal and village detection into one result
use log::{debug, info};
use std::sync::Arc;

use crate::address::admin_name::{capitalize_words, parse_admin_name};
use crate::address::normalizer::{extract_tokens, normalize};
use crate::address::phonetic::{fold_normalized, phonetic_fold};
use crate::error::ResolveError;
use crate::hierarchy::store::HierarchyStore;
use crate::matching::decision::CandidateSet;
use crate::matching::mandal::MandalDetector;
use crate::matching::policy::MatchPolicy;
use crate::matching::similarity::is_fuzzy_match;
use crate::matching::village::{phrase_matches, VillageDetector};
use crate::models::hierarchy::District;
use crate::models::parse_result::{LocatedParseResult, ParseResult};
use crate::models::verdict::DetectionVerdict;

/// Display form of a mandal name: the full reference name when the address repeats one of
/// its bracketed qualifiers ("Mavala (New)"), otherwise the capitalized base ("Mavala").
pub fn resolve_mandal_display_name(mandal_name: &str, address: &str) -> String {
    let parts = parse_admin_name(mandal_name);
    let normalized_address = normalize(address);
    let address_words: Vec<&str> = normalized_address.split_whitespace().collect();

    if parts
        .qualifiers
        .iter()
        .any(|q| address_words.contains(&q.as_str()))
    {
        return mandal_name.to_string();
    }
    if parts.base_name.is_empty() {
        return mandal_name.to_string();
    }
    capitalize_words(&parts.base_name)
}

pub struct AddressParseService {
    store: Arc<dyn HierarchyStore>,
    villages: VillageDetector,
}

impl AddressParseService {
    pub fn new(store: Arc<dyn HierarchyStore>, policy: MatchPolicy) -> Self {
        Self {
            villages: VillageDetector::new(store.clone(), policy),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn HierarchyStore> {
        &self.store
    }

    pub fn village_detector(&self) -> &VillageDetector {
        &self.villages
    }

    pub fn mandal_detector(&self) -> MandalDetector {
        MandalDetector::new(self.store.clone())
    }

    /// Resolves `address` inside `district_name`. Ambiguity and misses are verdicts; only
    /// an unknown district is an error.
    pub fn parse(&self, district_name: &str, address: &str) -> Result<ParseResult, ResolveError> {
        if district_name.trim().is_empty() || address.trim().is_empty() {
            return Ok(ParseResult::not_found());
        }
        let district = self
            .store
            .get_hierarchy(district_name)
            .ok_or_else(|| ResolveError::DistrictNotFound(district_name.to_string()))?;

        let result = self.parse_in(&district, address);
        debug!(
            "Parsed '{}' in {}: mandal={} village={}",
            address,
            district.name,
            result.mandal(),
            result.village()
        );
        Ok(result)
    }

    pub fn parse_in(&self, district: &District, address: &str) -> ParseResult {
        match MandalDetector::detect_mandal_in(district, address) {
            DetectionVerdict::Single(mandal_name) => {
                let village = self.villages.detect_village_in(district, &mandal_name, address);
                let display = resolve_mandal_display_name(&mandal_name, address);
                ParseResult::new(DetectionVerdict::Single(display), village)
            }
            DetectionVerdict::NotFound => self.resolve_from_village(district, address),
            ambiguous => ParseResult::from_mandal_verdict(ambiguous),
        }
    }

    /// Mandal detection failed: find the village anywhere in the district and derive the
    /// mandal from its owners.
    fn resolve_from_village(&self, district: &District, address: &str) -> ParseResult {
        let address_tokens: Vec<String> = extract_tokens(address)
            .iter()
            .map(|t| phonetic_fold(t))
            .collect();

        match self.villages.detect_across_in(district, address) {
            DetectionVerdict::Single(village_name) => {
                let owners = VillageDetector::find_mandals_by_village_in(district, &village_name);
                let village = DetectionVerdict::Single(village_name);
                match owners.as_slice() {
                    [] => ParseResult::new(DetectionVerdict::NotFound, village),
                    [owner] => ParseResult::new(
                        DetectionVerdict::Single(resolve_mandal_display_name(owner, address)),
                        village,
                    ),
                    _ => match pick_named_owner(&owners, &address_tokens) {
                        Some(owner) => ParseResult::new(
                            DetectionVerdict::Single(resolve_mandal_display_name(owner, address)),
                            village,
                        ),
                        None => ParseResult::new(DetectionVerdict::Multiple(owners), village),
                    },
                }
            }
            DetectionVerdict::Multiple(village_names) => {
                let mut owners = CandidateSet::new();
                for village_name in &village_names {
                    for owner in VillageDetector::find_mandals_by_village_in(district, village_name) {
                        owners.push(&owner);
                    }
                }
                // several villages leave the mandal ambiguous even when they share one
                let mandal = if owners.is_empty() {
                    DetectionVerdict::NotFound
                } else {
                    DetectionVerdict::Multiple(owners.into_vec())
                };
                ParseResult::new(mandal, DetectionVerdict::Multiple(village_names))
            }
            _ => {
                if phrase_matches(&address_tokens, &district.key.folded) {
                    debug!("Only the district is named, resolving to {}", district.name);
                    ParseResult::new(
                        DetectionVerdict::Single(district.name.clone()),
                        DetectionVerdict::Single(district.name.clone()),
                    )
                } else {
                    ParseResult::not_found()
                }
            }
        }
    }

    /// Locates the district as well: mandal detection runs in every loaded district and
    /// the full parse happens only when exactly one district has a single mandal.
    pub fn parse_any_district(&self, address: &str) -> LocatedParseResult {
        if address.trim().is_empty() {
            return LocatedParseResult {
                district: None,
                result: ParseResult::not_found(),
            };
        }

        let mut hits: Vec<(Arc<District>, String)> = Vec::new();
        for name in self.store.district_names() {
            let Some(district) = self.store.get_hierarchy(&name) else {
                continue;
            };
            if let DetectionVerdict::Single(mandal) =
                MandalDetector::detect_mandal_in(&district, address)
            {
                hits.push((district, mandal));
            }
        }

        match hits.len() {
            0 => LocatedParseResult {
                district: None,
                result: ParseResult::not_found(),
            },
            1 => {
                let (district, _) = &hits[0];
                info!("Address '{}' located in district {}", address, district.name);
                LocatedParseResult {
                    district: Some(district.name.clone()),
                    result: self.parse_in(district, address),
                }
            }
            _ => {
                let candidates = hits
                    .iter()
                    .map(|(district, mandal)| format!("{} ({})", mandal, district.name))
                    .collect();
                LocatedParseResult {
                    district: None,
                    result: ParseResult::from_mandal_verdict(
                        DetectionVerdict::MultipleDistricts(candidates),
                    ),
                }
            }
        }
    }
}

/// First owner, in hierarchy order, that the address itself names.
fn pick_named_owner<'a>(owners: &'a [String], address_tokens: &[String]) -> Option<&'a String> {
    owners.iter().find(|owner| {
        let folded = fold_normalized(owner);
        address_tokens
            .iter()
            .any(|t| *t == folded || is_fuzzy_match(t, &folded))
            || phrase_matches(address_tokens, &folded)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{adilabad_store, two_district_store};

    fn service() -> AddressParseService {
        AddressParseService::new(adilabad_store(), MatchPolicy::default())
    }

    fn single(name: &str) -> DetectionVerdict {
        DetectionVerdict::Single(name.to_string())
    }

    fn multiple(names: &[&str]) -> DetectionVerdict {
        DetectionVerdict::Multiple(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_mandal_then_scoped_village() {
        let result = service()
            .parse("Adilabad", "H.No 4-12, Muthnoor (V), Indervelly Mandal, Adilabad Dist")
            .unwrap();
        assert_eq!(result.mandal(), &single("Indervelly"));
        assert_eq!(result.village(), &single("Muthnur"));
    }

    #[test]
    fn test_ambiguous_mandal_skips_village() {
        let result = service().parse("Adilabad", "gundala ichoda bela road").unwrap();
        assert_eq!(result.mandal(), &multiple(&["Ichoda", "Bela"]));
        assert_eq!(result.village(), &DetectionVerdict::NotFound);
    }

    #[test]
    fn test_village_with_single_owner_resolves_mandal() {
        let result = service().parse("Adilabad", "muthnoor post").unwrap();
        assert_eq!(result.mandal(), &single("Indervelly"));
        assert_eq!(result.village(), &single("Muthnur"));
    }

    #[test]
    fn test_village_in_two_mandals() {
        let svc = service();
        let result = svc.parse("Adilabad", "narsapur").unwrap();
        assert_eq!(result.mandal(), &multiple(&["Ichoda", "Bela"]));
        assert_eq!(result.village(), &single("Narsapur"));

        let result = svc.parse("Adilabad", "khanapur adilabad").unwrap();
        assert_eq!(result.mandal(), &single("Adilabad"));
        assert_eq!(result.village(), &single("Khanapur"));
    }

    #[test]
    fn test_multiple_villages_report_union_of_owners() {
        let result = service().parse("Adilabad", "gundala keslapur").unwrap();
        assert_eq!(result.mandal(), &multiple(&["Ichoda", "Indervelly"]));
        assert_eq!(result.village(), &multiple(&["Gundala", "Keslapur"]));

        // one shared owner is still reported as ambiguous
        let result = service().parse("Adilabad", "gundala sirichelma").unwrap();
        assert_eq!(result.mandal(), &multiple(&["Ichoda"]));
        assert_eq!(result.village(), &multiple(&["Gundala", "Sirichelma"]));
        assert_eq!(result.mandal_name(), None);
    }

    #[test]
    fn test_district_only_address_falls_back_to_district() {
        let result = service().parse("Adilabad", "Adilabad District").unwrap();
        assert_eq!(result.mandal(), &single("Adilabad"));
        assert_eq!(result.village(), &single("Adilabad"));

        let result = service().parse("Adilabad", "somewhere unknown").unwrap();
        assert_eq!(result, ParseResult::not_found());
    }

    #[test]
    fn test_multi_word_district_name_falls_back_to_district() {
        let mut store = crate::hierarchy::store::InMemoryHierarchyStore::new();
        store.insert(
            District::from_json(
                "Komaram Bheem",
                r#"{"mandals": [{"mandalName": "Asifabad", "villages": [
                    {"villageName": "Asifabad"},
                    {"villageName": "Wankidi"}
                ]}]}"#,
            )
            .unwrap(),
        );
        let svc = AddressParseService::new(Arc::new(store), MatchPolicy::default());
        let result = svc.parse("Komaram Bheem", "Komaram Bheem District").unwrap();
        assert_eq!(result.mandal(), &single("Komaram Bheem"));
        assert_eq!(result.village(), &single("Komaram Bheem"));
    }

    #[test]
    fn test_empty_input_and_unknown_district() {
        let svc = service();
        assert_eq!(svc.parse("", "ichoda").unwrap(), ParseResult::not_found());
        assert_eq!(svc.parse("Adilabad", " ").unwrap(), ParseResult::not_found());
        assert_eq!(
            svc.parse("Warangal", "ichoda"),
            Err(ResolveError::DistrictNotFound("Warangal".into()))
        );
    }

    #[test]
    fn test_display_name_keeps_qualifier_only_when_written() {
        let svc = service();
        let result = svc.parse("Adilabad", "waghapur mavala new").unwrap();
        assert_eq!(result.mandal(), &single("Mavala (New)"));
        assert_eq!(result.village(), &single("Waghapur"));

        let result = svc.parse("Adilabad", "waghapur mavala").unwrap();
        assert_eq!(result.mandal(), &single("Mavala"));

        assert_eq!(resolve_mandal_display_name("Ichoda", "anything"), "Ichoda");
        assert_eq!(resolve_mandal_display_name("(New)", "anything"), "(New)");
    }

    #[test]
    fn test_parse_any_district() {
        let svc = AddressParseService::new(two_district_store(), MatchPolicy::default());

        let located = svc.parse_any_district("peddur kadem");
        assert_eq!(located.district.as_deref(), Some("Nirmal"));
        assert_eq!(located.result.mandal(), &single("Kadem"));
        assert_eq!(located.result.village(), &single("Peddur"));

        let located = svc.parse_any_district("bela sangidi");
        assert_eq!(located.district, None);
        assert_eq!(
            located.result.mandal(),
            &DetectionVerdict::MultipleDistricts(vec![
                "Bela (Adilabad)".into(),
                "Bela (Nirmal)".into()
            ])
        );

        let located = svc.parse_any_district("no such place");
        assert_eq!(located.result, ParseResult::not_found());
    }
}
