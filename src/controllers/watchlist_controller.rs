use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    models::{CurrentUser, WatchlistItem},
    services::watchlist_service::{self, AddWatchlistRequest},
    AppState,
};

use super::unauthorized;

fn watchlist_row(item: &WatchlistItem) -> serde_json::Value {
    json!({
        "id": item.id.to_hex(),
        "name": item.name,
        "symbol": item.symbol,
        "fallbackPrice": item.fallback_price,
    })
}

// GET /watchlist
pub async fn get_watchlist(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match watchlist_service::list_watchlist(&state, u.id).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => e.into_response(),
    }
}

// POST /watchlist/add
pub async fn post_add_to_watchlist(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<AddWatchlistRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match watchlist_service::add_to_watchlist(&state, u.id, body).await {
        Ok(item) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Company added to watchlist successfully",
                "data": watchlist_row(&item),
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// DELETE /watchlist/:symbol
pub async fn delete_from_watchlist(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match watchlist_service::remove_from_watchlist(&state, u.id, &symbol).await {
        Ok(item) => Json(json!({
            "success": true,
            "message": "Company removed from watchlist successfully",
            "data": watchlist_row(&item),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
