use std::time::Duration;

use axum::{
    extract::{Extension, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::CurrentUser,
    services::{indices_service, quotes},
    AppState,
};

use super::unauthorized;

const QUOTE_MAX_AGE: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

// GET /stocks/search?q=
pub async fn get_search(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Json(json!({ "success": true, "results": [] })).into_response();
    }

    match state.quotes.search(q).await {
        Ok(matches) => Json(json!({
            "success": true,
            "results": matches.into_iter().take(10).collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(query = %q, error = %e, "symbol search failed");
            Json(json!({
                "success": true,
                "results": [],
                "error": "Search is temporarily unavailable",
            }))
            .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub symbol: Option<String>,
}

// GET /stocks/price?symbol=
//
// Degrades rather than fails: an unreachable provider yields the stalest
// cached quote we have, or zeros with the fallback flag set.
pub async fn get_price(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Query(query): Query<PriceQuery>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    let Some(symbol) = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
    else {
        return crate::error::AppError::Validation("symbol is required".to_string()).into_response();
    };

    let quote = match quotes::cached_quote(&state, &symbol, QUOTE_MAX_AGE).await {
        Some(q) => Some((q, false)),
        None => state
            .price_cache
            .get(&symbol, Duration::MAX)
            .map(|q| (q, true)),
    };

    match quote {
        Some((q, stale)) => Json(json!({
            "success": true,
            "symbol": symbol,
            "price": q.price,
            "change": q.change,
            "percentChange": q.percent_change,
            "usingFallback": stale,
        }))
        .into_response(),
        None => Json(json!({
            "success": true,
            "symbol": symbol,
            "price": 0.0,
            "change": 0.0,
            "percentChange": 0.0,
            "usingFallback": true,
        }))
        .into_response(),
    }
}

// GET /indices
pub async fn get_indices(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    Json(indices_service::get_indices(&state).await).into_response()
}
