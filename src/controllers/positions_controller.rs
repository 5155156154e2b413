use axum::{
    extract::{Extension, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    models::{CurrentUser, Position},
    services::{
        positions_service::{self, SquareOffRequest},
        valuation::round2,
    },
    AppState,
};

use super::unauthorized;

fn position_row(p: &Position) -> serde_json::Value {
    json!({
        "id": p.id.to_hex(),
        "name": p.name,
        "symbol": p.symbol,
        "product": p.product,
        "qty": p.qty,
        "avg": p.avg,
        "lastPrice": p.last_price,
        "livePrice": p.live_price,
        "change": p.change,
        "changePercentage": p.change_percentage,
        "exchange": p.exchange,
        "instrument": p.instrument,
        "lastUpdated": p.last_updated,
        "createdAt": p.created_at,
    })
}

// GET /positions
pub async fn get_all_positions(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match positions_service::list_positions(&state, u.id).await {
        Ok((views, summary)) => Json(json!({
            "success": true,
            "data": views,
            "summary": {
                "totalInvestment": round2(summary.total_investment),
                "totalCurrentValue": round2(summary.total_current_value),
                "totalPnl": round2(summary.total_pnl),
                "totalPnlPercentage": round2(summary.total_pnl_percentage()),
                "totalDayPnl": round2(summary.total_day_pnl),
            },
            "lastUpdated": Utc::now().timestamp(),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// GET /positions/:symbol
pub async fn get_position_by_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match positions_service::get_position_by_symbol(&state, u.id, &symbol).await {
        Ok(position) => Json(json!({
            "success": true,
            "data": position_row(&position),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// POST /positions/square-off
pub async fn post_square_off(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<SquareOffRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match positions_service::square_off(&state, u.id, body).await {
        Ok(result) => Json(json!({
            "success": true,
            "message": "Position squared off successfully",
            "data": result,
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
