// src/pipeline/parse_pool.rs - Ordered concurrent parsing with a per-run address cache
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::parse_result::ParseResult;
use crate::service::address_parse::AddressParseService;

/// Raw address -> result memo for one run. Never invalidated; dropped with the run.
#[derive(Default)]
pub struct ParseCache {
    entries: Mutex<HashMap<String, ParseResult>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

pub type SharedParseCache = Arc<ParseCache>;

pub fn create_shared_cache() -> SharedParseCache {
    Arc::new(ParseCache::default())
}

impl ParseCache {
    pub fn get(&self, address: &str) -> Option<ParseResult> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(address) {
            Some(result) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(result.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, address: &str, result: ParseResult) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.to_string(), result);
    }

    /// (hits, misses, entries)
    pub fn stats(&self) -> (usize, usize, usize) {
        let len = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            len,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(ParseResult),
    Cached(ParseResult),
    /// No usable address on the record.
    Skipped,
    Failed { error: String },
}

impl ParseOutcome {
    pub fn result(&self) -> Option<&ParseResult> {
        match self {
            ParseOutcome::Parsed(result) | ParseOutcome::Cached(result) => Some(result),
            _ => None,
        }
    }

    /// Skipped and failed records read as not found.
    pub fn into_result(self) -> ParseResult {
        match self {
            ParseOutcome::Parsed(result) | ParseOutcome::Cached(result) => result,
            _ => ParseResult::not_found(),
        }
    }
}

fn is_missing_address(address: Option<&str>) -> bool {
    match address {
        None => true,
        Some(a) => a.trim().is_empty() || a.trim().eq_ignore_ascii_case("null"),
    }
}

pub fn parse_safely(
    service: &AddressParseService,
    district: &str,
    address: Option<&str>,
    cache: Option<&ParseCache>,
) -> ParseOutcome {
    let address = match address {
        Some(a) if !is_missing_address(Some(a)) => a,
        _ => return ParseOutcome::Skipped,
    };

    if let Some(cached) = cache.and_then(|c| c.get(address)) {
        return ParseOutcome::Cached(cached);
    }

    match service.parse(district, address) {
        Ok(result) => {
            if let Some(cache) = cache {
                cache.insert(address, result.clone());
            }
            ParseOutcome::Parsed(result)
        }
        Err(e) => {
            debug!("Parse failed for address '{}': {}", address, e);
            ParseOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Parses every address on blocking workers, at most `workers` at a time. Outcomes come
/// back in input order.
pub async fn parse_addresses_ordered(
    service: Arc<AddressParseService>,
    district: Arc<str>,
    addresses: Vec<Option<String>>,
    cache: Option<SharedParseCache>,
    workers: usize,
) -> Vec<ParseOutcome> {
    stream::iter(addresses)
        .map(|address| {
            let service = service.clone();
            let district = district.clone();
            let cache = cache.clone();
            tokio::task::spawn_blocking(move || {
                parse_safely(&service, &district, address.as_deref(), cache.as_deref())
            })
        })
        .buffered(workers.max(1))
        .map(|joined| match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Parse worker failed: {}", e);
                ParseOutcome::Failed {
                    error: e.to_string(),
                }
            }
        })
        .collect::<Vec<_>>()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::policy::MatchPolicy;
    use crate::test_fixtures::adilabad_store;

    fn service() -> Arc<AddressParseService> {
        Arc::new(AddressParseService::new(adilabad_store(), MatchPolicy::default()))
    }

    #[test]
    fn test_parse_safely_skips_missing_addresses() {
        let svc = service();
        assert_eq!(parse_safely(&svc, "Adilabad", None, None), ParseOutcome::Skipped);
        assert_eq!(parse_safely(&svc, "Adilabad", Some("NULL"), None), ParseOutcome::Skipped);
        assert_eq!(parse_safely(&svc, "Adilabad", Some("  "), None), ParseOutcome::Skipped);
        assert!(matches!(
            parse_safely(&svc, "Warangal", Some("ichoda"), None),
            ParseOutcome::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_ordered_results_and_cache_hits() {
        let cache = create_shared_cache();
        let addresses = vec![
            Some("muthnoor post".to_string()),
            None,
            Some("gundala ichoda bela road".to_string()),
            Some("muthnoor post".to_string()),
        ];

        let outcomes = parse_addresses_ordered(
            service(),
            Arc::from("Adilabad"),
            addresses,
            Some(cache.clone()),
            1,
        )
        .await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes[0].result().and_then(|r| r.village_name()),
            Some("Muthnur")
        );
        assert_eq!(outcomes[1], ParseOutcome::Skipped);
        assert_eq!(
            outcomes[2].result().map(|r| r.mandal_status_label()),
            Some("MULTIPLE_MANDALS")
        );
        assert!(matches!(outcomes[3], ParseOutcome::Cached(_)));

        let (hits, misses, entries) = cache.stats();
        assert_eq!((hits, misses, entries), (1, 2, 2));
    }
}
