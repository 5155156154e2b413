use std::time::Duration;

use serde_json::{Map, Value};

use crate::{services::quotes, AppState};

const QUOTE_MAX_AGE: Duration = Duration::from_secs(60);

struct IndexConfig {
    name: &'static str,
    symbol: &'static str,
    fallback_value: f64,
}

const INDEX_CONFIGS: &[IndexConfig] = &[
    IndexConfig { name: "nifty", symbol: "NSEI", fallback_value: 18200.55 },
    IndexConfig { name: "sensex", symbol: "BSESN", fallback_value: 61000.25 },
    IndexConfig { name: "niftyBank", symbol: "NSEBANK", fallback_value: 38500.75 },
    IndexConfig { name: "niftyIt", symbol: "CNXIT", fallback_value: 28500.30 },
    IndexConfig { name: "bseMidcap", symbol: "BSEMIDCAP", fallback_value: 15500.40 },
    IndexConfig { name: "bseSmallcap", symbol: "BSESMALLCAP", fallback_value: 12500.60 },
];

/// Market index snapshot. This read path never fails: any index the
/// provider cannot price comes back as its static fallback value.
pub async fn get_indices(state: &AppState) -> Map<String, Value> {
    let mut out = Map::new();

    for cfg in INDEX_CONFIGS {
        let value = match quotes::cached_quote(state, cfg.symbol, QUOTE_MAX_AGE).await {
            Some(q) => q.price,
            None => cfg.fallback_value,
        };
        out.insert(cfg.name.to_string(), Value::from(value));
    }

    out
}
