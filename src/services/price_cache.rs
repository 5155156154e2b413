use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::quotes::Quote;

#[derive(Debug, Clone)]
struct CachedQuote {
    quote: Quote,
    fetched_at: Instant,
}

/// Process-wide quote cache keyed by symbol. Entries never expire on their
/// own; each call site passes the freshness window it can tolerate, so the
/// holdings and positions read paths can use different TTLs over the same
/// data.
#[derive(Default)]
pub struct PriceCache {
    entries: DashMap<String, CachedQuote>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, symbol: &str, max_age: Duration) -> Option<Quote> {
        let entry = self.entries.get(&symbol.to_uppercase())?;
        if entry.fetched_at.elapsed() < max_age {
            Some(entry.quote.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, symbol: &str, quote: Quote) {
        self.entries.insert(
            symbol.to_uppercase(),
            CachedQuote {
                quote,
                fetched_at: Instant::now(),
            },
        );
    }
}
