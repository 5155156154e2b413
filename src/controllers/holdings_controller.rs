use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    models::{CurrentUser, Holding},
    services::{
        holdings_service::{self, AddHoldingRequest, UpdateHoldingRequest},
        valuation::round2,
    },
    AppState,
};

use super::unauthorized;

fn holding_row(h: &Holding) -> serde_json::Value {
    json!({
        "id": h.id.to_hex(),
        "name": h.name,
        "symbol": h.symbol,
        "qty": h.qty,
        "avg": h.avg,
        "lastPrice": h.last_price,
        "exchange": h.exchange,
        "instrument": h.instrument,
        "createdAt": h.created_at,
        "updatedAt": h.updated_at,
    })
}

// GET /holdings
pub async fn get_all_holdings(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match holdings_service::list_holdings(&state, u.id).await {
        Ok((views, summary)) => Json(json!({
            "success": true,
            "data": views,
            "summary": {
                "totalInvestment": round2(summary.total_investment),
                "currentValue": round2(summary.total_current_value),
                "totalPnl": round2(summary.total_pnl),
                "totalPnlPercentage": round2(summary.total_pnl_percentage()),
                "dayPnl": round2(summary.total_day_pnl),
            },
            "lastUpdated": Utc::now().timestamp(),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// POST /holdings
pub async fn post_add_holding(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<AddHoldingRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match holdings_service::add_holding(&state, u.id, body).await {
        Ok(holding) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Holding added successfully",
                "data": holding_row(&holding),
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// PUT /holdings/:id
pub async fn put_update_holding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<UpdateHoldingRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match holdings_service::update_holding(&state, u.id, &id, body).await {
        Ok(holding) => Json(json!({
            "success": true,
            "message": "Holding updated successfully",
            "data": holding_row(&holding),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// DELETE /holdings/:id
pub async fn delete_holding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match holdings_service::delete_holding(&state, u.id, &id).await {
        Ok(()) => Json(json!({
            "success": true,
            "message": "Holding deleted successfully",
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
