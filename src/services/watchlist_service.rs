use std::time::Duration;

use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::WatchlistItem,
    services::quotes,
    AppState,
};

const QUOTE_MAX_AGE: Duration = Duration::from_secs(60);

/// Seed rows every user sees, with realistic fallback prices for when the
/// quote provider is down or rate-limited.
const STATIC_WATCHLIST: &[(&str, &str, f64)] = &[
    ("Apple Inc", "AAPL", 245.27),
    ("Microsoft", "MSFT", 510.96),
    ("Tesla", "TSLA", 413.49),
    ("Amazon", "AMZN", 216.37),
    ("Google", "GOOGL", 236.57),
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistView {
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub is_loss: bool,
    pub using_fallback: bool,
    pub is_static: bool,
}

struct Candidate {
    name: String,
    symbol: String,
    fallback_price: f64,
    is_static: bool,
}

pub async fn list_watchlist(state: &AppState, user_id: ObjectId) -> Result<Vec<WatchlistView>> {
    let watchlist = state.db.collection::<WatchlistItem>("watchlist");
    let mut cursor = watchlist.find(doc! { "user_id": user_id }, None).await?;

    let mut user_rows: Vec<WatchlistItem> = vec![];
    while let Some(res) = cursor.next().await {
        user_rows.push(res?);
    }

    // Static seed first, then user rows not already covered by it.
    let mut seen: Vec<String> = vec![];
    let mut candidates: Vec<Candidate> = vec![];
    for (name, symbol, fallback) in STATIC_WATCHLIST {
        seen.push((*symbol).to_string());
        candidates.push(Candidate {
            name: (*name).to_string(),
            symbol: (*symbol).to_string(),
            fallback_price: *fallback,
            is_static: true,
        });
    }
    for item in user_rows {
        if !seen.iter().any(|s| s == &item.symbol) {
            seen.push(item.symbol.clone());
            candidates.push(Candidate {
                name: item.name,
                symbol: item.symbol,
                fallback_price: item.fallback_price,
                is_static: false,
            });
        }
    }

    // One provider failure usually means rate limiting; stop hammering the
    // API for the rest of the batch and serve fallbacks.
    let mut provider_down = false;
    let mut out: Vec<WatchlistView> = vec![];

    for c in candidates {
        let quote = if provider_down {
            None
        } else {
            let q = quotes::cached_quote(state, &c.symbol, QUOTE_MAX_AGE).await;
            if q.is_none() {
                provider_down = true;
            }
            q
        };

        out.push(match quote {
            Some(q) => WatchlistView {
                name: c.name,
                symbol: c.symbol,
                current_price: q.price,
                change: q.change,
                percent_change: q.percent_change,
                is_loss: q.change < 0.0,
                using_fallback: false,
                is_static: c.is_static,
            },
            None => WatchlistView {
                name: c.name,
                symbol: c.symbol,
                current_price: c.fallback_price,
                change: 0.0,
                percent_change: 0.0,
                is_loss: false,
                using_fallback: true,
                is_static: c.is_static,
            },
        });
    }

    Ok(out)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWatchlistRequest {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub fallback_price: Option<f64>,
}

pub async fn add_to_watchlist(
    state: &AppState,
    user_id: ObjectId,
    req: AddWatchlistRequest,
) -> Result<WatchlistItem> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    let symbol = req
        .symbol
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_uppercase();

    if name.is_empty() || symbol.is_empty() {
        return Err(AppError::Validation(
            "Company name and symbol are required".to_string(),
        ));
    }

    let watchlist = state.db.collection::<WatchlistItem>("watchlist");

    let existing = watchlist
        .find_one(doc! { "user_id": user_id, "symbol": &symbol }, None)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Company already exists in watchlist".to_string(),
        ));
    }

    let item = WatchlistItem {
        id: ObjectId::new(),
        user_id,
        name: name.to_string(),
        symbol,
        fallback_price: req.fallback_price.unwrap_or(0.0),
    };

    watchlist.insert_one(&item, None).await?;
    Ok(item)
}

pub async fn remove_from_watchlist(
    state: &AppState,
    user_id: ObjectId,
    symbol: &str,
) -> Result<WatchlistItem> {
    let sym = symbol.to_uppercase();
    let watchlist = state.db.collection::<WatchlistItem>("watchlist");

    watchlist
        .find_one_and_delete(doc! { "user_id": user_id, "symbol": &sym }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found in watchlist".to_string()))
}
