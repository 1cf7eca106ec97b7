//! Per-station lookup sequence: primary geocoder first, railway feature
//! search only when the geocoder has no match.

use std::thread;
use std::time::Duration;

use crate::api::{NominatimClient, OverpassClient};
use crate::config::{ResolverConfig, search_query};
use crate::domain::{FallbackMatch, LookupResult, PrimaryLookup};

/// First provider consulted for every station.
pub trait PrimaryProvider {
    fn search(&self, query: &str) -> PrimaryLookup;
}

/// Consulted only after the primary provider answered with no match.
/// Failures and misses both come back as `None`.
pub trait FallbackProvider {
    fn find(&self, name: &str) -> Option<FallbackMatch>;
}

impl PrimaryProvider for NominatimClient {
    fn search(&self, query: &str) -> PrimaryLookup {
        NominatimClient::search(self, query)
    }
}

impl FallbackProvider for OverpassClient {
    fn find(&self, name: &str) -> Option<FallbackMatch> {
        self.find_railway_feature(name)
    }
}

/// Receives narration as the run advances. All methods default to no-ops.
pub trait Progress {
    fn looking_up(&mut self, _query: &str) {}
    fn primary_missed(&mut self, _name: &str) {}
    fn resolved(&mut self, _result: &LookupResult) {}
}

/// Progress sink that reports nothing.
pub struct Silent;

impl Progress for Silent {}

pub struct Resolver<P, F> {
    primary: P,
    fallback: F,
    query_suffix: String,
    delay: Duration,
}

impl<P: PrimaryProvider, F: FallbackProvider> Resolver<P, F> {
    pub fn new(primary: P, fallback: F, config: &ResolverConfig) -> Self {
        Self {
            primary,
            fallback,
            query_suffix: config.query_suffix.clone(),
            delay: config.delay,
        }
    }

    /// Resolve one station into exactly one record.
    pub fn resolve_station(&self, name: &str, progress: &mut impl Progress) -> LookupResult {
        let query = search_query(name, &self.query_suffix);
        progress.looking_up(&query);

        let result = match self.primary.search(&query) {
            PrimaryLookup::Found(found) => LookupResult::from_primary(name, found),
            PrimaryLookup::NotFound => {
                progress.primary_missed(name);
                match self.fallback.find(name) {
                    Some(found) => LookupResult::from_fallback(name, found),
                    None => LookupResult::not_found(name),
                }
            }
            PrimaryLookup::Failed(error) => {
                tracing::debug!(station = name, %error, "primary lookup failed");
                LookupResult::failed(name, error)
            }
        };

        progress.resolved(&result);
        result
    }

    /// Resolve every station in order, pausing between stations.
    ///
    /// The returned list always has one record per input name, in input order.
    pub fn run(&self, stations: &[String], progress: &mut impl Progress) -> Vec<LookupResult> {
        let mut results = Vec::with_capacity(stations.len());

        for (i, name) in stations.iter().enumerate() {
            results.push(self.resolve_station(name, progress));

            if i + 1 < stations.len() && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PrimaryMatch, TransportError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakePrimary {
        answers: HashMap<String, PrimaryLookup>,
        queries: RefCell<Vec<String>>,
    }

    impl FakePrimary {
        fn answer(mut self, query: &str, lookup: PrimaryLookup) -> Self {
            self.answers.insert(query.to_string(), lookup);
            self
        }
    }

    impl PrimaryProvider for &FakePrimary {
        fn search(&self, query: &str) -> PrimaryLookup {
            self.queries.borrow_mut().push(query.to_string());
            self.answers
                .get(query)
                .cloned()
                .unwrap_or(PrimaryLookup::NotFound)
        }
    }

    #[derive(Default)]
    struct FakeFallback {
        answers: HashMap<String, FallbackMatch>,
        names: RefCell<Vec<String>>,
    }

    impl FakeFallback {
        fn answer(mut self, name: &str, found: FallbackMatch) -> Self {
            self.answers.insert(name.to_string(), found);
            self
        }

        fn calls(&self) -> usize {
            self.names.borrow().len()
        }
    }

    impl FallbackProvider for &FakeFallback {
        fn find(&self, name: &str) -> Option<FallbackMatch> {
            self.names.borrow_mut().push(name.to_string());
            self.answers.get(name).cloned()
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Progress for Recorder {
        fn looking_up(&mut self, query: &str) {
            self.events.push(format!("lookup {}", query));
        }
        fn primary_missed(&mut self, name: &str) {
            self.events.push(format!("miss {}", name));
        }
        fn resolved(&mut self, result: &LookupResult) {
            self.events.push(format!("done {}", result.query()));
        }
    }

    fn config() -> ResolverConfig {
        ResolverConfig {
            delay: Duration::ZERO,
            ..ResolverConfig::default()
        }
    }

    fn virar() -> PrimaryMatch {
        PrimaryMatch {
            display_name: Some("Virar Railway Station, Maharashtra, India".into()),
            lat: Some("19.4559".into()),
            lon: Some("72.8135".into()),
            kind: Some("station".into()),
        }
    }

    fn stations(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_primary_hit_skips_fallback() {
        let primary =
            FakePrimary::default().answer("VIRAR railway station India", PrimaryLookup::Found(virar()));
        let fallback = FakeFallback::default();
        let resolver = Resolver::new(&primary, &fallback, &config());

        let results = resolver.run(&stations(&["VIRAR"]), &mut Silent);

        assert_eq!(results, vec![LookupResult::from_primary("VIRAR", virar())]);
        assert_eq!(fallback.calls(), 0);
        assert_eq!(*primary.queries.borrow(), vec!["VIRAR railway station India"]);
    }

    #[test]
    fn test_empty_primary_uses_fallback() {
        let found = FallbackMatch {
            display_name: Some("Karambeli".into()),
            lat: 20.4455,
            lon: 72.9012,
        };
        let primary = FakePrimary::default();
        let fallback = FakeFallback::default().answer("Karambeli", found.clone());
        let resolver = Resolver::new(&primary, &fallback, &config());

        let results = resolver.run(&stations(&["Karambeli"]), &mut Silent);

        assert_eq!(results, vec![LookupResult::from_fallback("Karambeli", found)]);
        assert_eq!(fallback.calls(), 1);
    }

    #[test]
    fn test_both_empty_records_nulls() {
        let primary = FakePrimary::default();
        let fallback = FakeFallback::default();
        let resolver = Resolver::new(&primary, &fallback, &config());

        let results = resolver.run(&stations(&["Ancheli"]), &mut Silent);

        assert_eq!(results, vec![LookupResult::not_found("Ancheli")]);
        assert_eq!(
            serde_json::to_string(&results[0]).unwrap(),
            r#"{"query":"Ancheli","display_name":null,"lat":null,"lon":null}"#
        );
    }

    #[test]
    fn test_transport_error_skips_fallback() {
        let primary = FakePrimary::default()
            .answer(
                "Vapi railway station India",
                PrimaryLookup::Failed(TransportError::Request("timed out".into())),
            )
            .answer(
                "Udvada railway station India",
                PrimaryLookup::Failed(TransportError::Status(429)),
            );
        let fallback = FakeFallback::default();
        let resolver = Resolver::new(&primary, &fallback, &config());

        let results = resolver.run(&stations(&["Vapi", "Udvada"]), &mut Silent);

        assert_eq!(
            results,
            vec![
                LookupResult::failed("Vapi", TransportError::Request("timed out".into())),
                LookupResult::failed("Udvada", TransportError::Status(429)),
            ]
        );
        assert_eq!(fallback.calls(), 0);
    }

    #[test]
    fn test_one_record_per_station_in_order() {
        let primary = FakePrimary::default()
            .answer("VIRAR railway station India", PrimaryLookup::Found(virar()))
            .answer(
                "Palghar railway station India",
                PrimaryLookup::Failed(TransportError::Status(500)),
            );
        let fallback = FakeFallback::default();
        let resolver = Resolver::new(&primary, &fallback, &config());
        let input = stations(&["Palghar", "VIRAR", "Palghar", "Boisar"]);

        let results = resolver.run(&input, &mut Silent);

        assert_eq!(results.len(), input.len());
        let queries: Vec<&str> = results.iter().map(LookupResult::query).collect();
        assert_eq!(queries, vec!["Palghar", "VIRAR", "Palghar", "Boisar"]);
        assert_eq!(*fallback.names.borrow(), vec!["Boisar"]);
    }

    #[test]
    fn test_progress_narration() {
        let primary = FakePrimary::default();
        let fallback = FakeFallback::default();
        let resolver = Resolver::new(&primary, &fallback, &config());
        let mut recorder = Recorder::default();

        resolver.run(&stations(&["Atul"]), &mut recorder);

        assert_eq!(
            recorder.events,
            vec!["lookup Atul railway station India", "miss Atul", "done Atul"]
        );
    }
}
