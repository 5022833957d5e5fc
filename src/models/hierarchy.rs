// src/models/hierarchy.rs - Immutable district -> mandal -> village reference tree
use serde::Deserialize;

use crate::address::normalizer::normalize;
use crate::address::phonetic::phonetic_fold;
use crate::error::ResolveError;

/// Match keys computed once at load: normalized text and its phonetic fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameKey {
    pub normalized: String,
    pub folded: String,
}

impl NameKey {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize(raw);
        let folded = phonetic_fold(&normalized);
        Self { normalized, folded }
    }

    /// Folded words of the name, in order.
    pub fn folded_words(&self) -> impl Iterator<Item = &str> {
        self.folded.split_whitespace()
    }
}

#[derive(Debug, Clone)]
pub struct Village {
    pub name: String,
    pub alias_name: Option<String>,
    pub is_mandal_headquarters: bool,
    pub key: NameKey,
    pub alias_key: Option<NameKey>,
}

impl Village {
    /// True when the folded query equals the folded name or alias.
    pub fn answers_to(&self, folded_query: &str) -> bool {
        self.key.folded == folded_query
            || self
                .alias_key
                .as_ref()
                .map_or(false, |alias| alias.folded == folded_query)
    }
}

#[derive(Debug, Clone)]
pub struct Mandal {
    pub name: String,
    pub alias_name: Option<String>,
    pub is_headquarters: bool,
    pub villages: Vec<Village>,
    pub key: NameKey,
    pub alias_key: Option<NameKey>,
}

impl Mandal {
    pub fn headquarters_village(&self) -> Option<&Village> {
        self.villages.iter().find(|v| v.is_mandal_headquarters)
    }
}

#[derive(Debug, Clone)]
pub struct District {
    pub name: String,
    pub key: NameKey,
    pub mandals: Vec<Mandal>,
}

// Wire shape of the hierarchy document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHierarchy {
    mandals: Vec<RawMandal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMandal {
    mandal_name: String,
    #[serde(default)]
    alias_name: Option<String>,
    #[serde(default)]
    is_headquarters: Option<bool>,
    #[serde(default)]
    villages: Vec<RawVillage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVillage {
    village_name: String,
    #[serde(default)]
    alias_name: Option<String>,
    #[serde(default)]
    is_mandal_headquarters: Option<bool>,
}

fn non_empty_alias(alias: Option<String>) -> Option<String> {
    alias
        .map(|a| a.trim().to_string())
        .filter(|a| !normalize(a).is_empty())
}

impl District {
    /// Parses a hierarchy JSON document for `district_name`. Match keys and headquarters
    /// flags are fixed here; a node without an explicit flag is headquarters when its
    /// folded name equals its parent's. A village also qualifies through its alias.
    pub fn from_json(district_name: &str, json: &str) -> Result<Self, ResolveError> {
        let district_key = NameKey::new(district_name);
        if district_key.normalized.is_empty() {
            return Err(ResolveError::malformed(district_name, "empty district name"));
        }

        let raw: RawHierarchy = serde_json::from_str(json)
            .map_err(|e| ResolveError::malformed(district_name, e.to_string()))?;

        let mut mandals = Vec::with_capacity(raw.mandals.len());
        for raw_mandal in raw.mandals {
            let mandal_key = NameKey::new(&raw_mandal.mandal_name);
            if mandal_key.normalized.is_empty() {
                return Err(ResolveError::malformed(district_name, "mandal with empty name"));
            }

            let mut villages = Vec::with_capacity(raw_mandal.villages.len());
            for raw_village in raw_mandal.villages {
                let village_key = NameKey::new(&raw_village.village_name);
                if village_key.normalized.is_empty() {
                    return Err(ResolveError::malformed(
                        district_name,
                        format!("village with empty name in mandal {}", raw_mandal.mandal_name),
                    ));
                }
                let alias_name = non_empty_alias(raw_village.alias_name);
                let alias_key = alias_name.as_deref().map(NameKey::new);
                let is_mandal_headquarters = raw_village.is_mandal_headquarters.unwrap_or_else(|| {
                    village_key.folded == mandal_key.folded
                        || alias_key
                            .as_ref()
                            .map_or(false, |alias| alias.folded == mandal_key.folded)
                });
                villages.push(Village {
                    name: raw_village.village_name.trim().to_string(),
                    alias_key,
                    alias_name,
                    is_mandal_headquarters,
                    key: village_key,
                });
            }

            let alias_name = non_empty_alias(raw_mandal.alias_name);
            let is_headquarters = raw_mandal
                .is_headquarters
                .unwrap_or(mandal_key.folded == district_key.folded);
            mandals.push(Mandal {
                name: raw_mandal.mandal_name.trim().to_string(),
                alias_key: alias_name.as_deref().map(NameKey::new),
                alias_name,
                is_headquarters,
                villages,
                key: mandal_key,
            });
        }

        Ok(District {
            name: district_name.trim().to_string(),
            key: district_key,
            mandals,
        })
    }

    /// Mandal whose normalized name equals the normalized query.
    pub fn find_mandal(&self, mandal_name: &str) -> Option<&Mandal> {
        let wanted = normalize(mandal_name);
        if wanted.is_empty() {
            return None;
        }
        self.mandals.iter().find(|m| m.key.normalized == wanted)
    }

    pub fn mandal_names(&self) -> Vec<String> {
        self.mandals.iter().map(|m| m.name.clone()).collect()
    }

    pub fn villages_of(&self, mandal_name: &str) -> Option<Vec<String>> {
        self.find_mandal(mandal_name)
            .map(|m| m.villages.iter().map(|v| v.name.clone()).collect())
    }

    pub fn headquarters_mandal(&self) -> Option<&Mandal> {
        self.mandals.iter().find(|m| m.is_headquarters)
    }

    pub fn village_count(&self) -> usize {
        self.mandals.iter().map(|m| m.villages.len()).sum()
    }
}
