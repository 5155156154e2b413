use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::AppState;

/// A single live quote for a symbol.
#[derive(Debug, Clone)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
}

#[derive(Clone)]
pub struct QuoteClient {
    http: Client,
    api_key: String,
}

const BASE_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<HashMap<String, String>>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchMatch {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub region: String,
}

impl QuoteClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub async fn global_quote(&self, symbol: &str) -> Result<Quote, String> {
        if !self.has_key() {
            return Err("ALPHA_VANTAGE_API_KEY is missing in .env".to_string());
        }

        let res = self
            .http
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", &self.api_key),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("quote request failed: {status} {body}"));
        }

        let parsed = res
            .json::<GlobalQuoteResponse>()
            .await
            .map_err(|e| e.to_string())?;

        let Some(fields) = parsed.global_quote else {
            return Err("no price data available".to_string());
        };

        // Alpha Vantage ships every value as a numbered string field.
        let price = parse_field(&fields, "05. price")?;
        let change = parse_field(&fields, "09. change").unwrap_or(0.0);
        let percent_change = fields
            .get("10. change percent")
            .and_then(|v| v.trim_end_matches('%').parse::<f64>().ok())
            .unwrap_or(0.0);

        Ok(Quote {
            price,
            change,
            percent_change,
        })
    }

    pub async fn search(&self, q: &str) -> Result<Vec<SearchMatch>, String> {
        if !self.has_key() {
            return Err("ALPHA_VANTAGE_API_KEY is missing in .env".to_string());
        }

        let res = self
            .http
            .get(BASE_URL)
            .query(&[
                ("function", "SYMBOL_SEARCH"),
                ("keywords", q),
                ("apikey", &self.api_key),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            return Err(format!("symbol search failed: {status}"));
        }

        let parsed = res
            .json::<SymbolSearchResponse>()
            .await
            .map_err(|e| e.to_string())?;

        let matches = parsed
            .best_matches
            .into_iter()
            .filter_map(|m| {
                let symbol = m.get("1. symbol")?.trim().to_string();
                if symbol.is_empty() {
                    return None;
                }
                Some(SearchMatch {
                    symbol,
                    name: m.get("2. name").cloned().unwrap_or_default(),
                    kind: m.get("3. type").cloned().unwrap_or_default(),
                    region: m.get("4. region").cloned().unwrap_or_default(),
                })
            })
            .collect();

        Ok(matches)
    }
}

fn parse_field(fields: &HashMap<String, String>, key: &str) -> Result<f64, String> {
    fields
        .get(key)
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| format!("missing quote field {key}"))
}

/// Cache-aware quote lookup. Returns `None` when the provider fails and the
/// cache has nothing fresh enough; callers degrade to stored prices.
pub async fn cached_quote(state: &AppState, symbol: &str, max_age: Duration) -> Option<Quote> {
    let sym = symbol.to_uppercase();

    if let Some(q) = state.price_cache.get(&sym, max_age) {
        return Some(q);
    }

    match state.quotes.global_quote(&sym).await {
        Ok(q) => {
            state.price_cache.insert(&sym, q.clone());
            Some(q)
        }
        Err(e) => {
            tracing::warn!(symbol = %sym, error = %e, "quote fetch failed, using fallback");
            None
        }
    }
}
