use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    models::CurrentUser,
    services::funds_service::{self, AddFundsRequest, WithdrawRequest},
    AppState,
};

use super::unauthorized;

// GET /funds/my-funds
pub async fn get_my_funds(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match funds_service::funds_summary(&state, u.id).await {
        Ok(summary) => Json(json!({
            "success": true,
            "data": {
                "totalFunds": summary.breakdown.total_funds(),
                "availableBalance": summary.breakdown.available_balance(),
                "investedAmount": summary.breakdown.total_investment,
                "fundsBreakdown": summary.breakdown,
                "fundsHistory": summary.history,
            },
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// POST /funds/add
pub async fn post_add_funds(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<AddFundsRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match funds_service::add_funds(&state, u.id, body).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Funds added successfully",
                "data": {
                    "addedAmount": result.added_amount,
                    "totalFunds": result.total_funds,
                    "transactionId": result.transaction_id,
                },
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// POST /funds/withdraw
pub async fn post_withdraw_funds(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<WithdrawRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match funds_service::withdraw(&state, u.id, body).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Funds withdrawn successfully",
                "data": {
                    "withdrawnAmount": result.withdrawn_amount,
                    "totalFunds": result.total_funds,
                    "availableBalance": result.available_balance,
                    "transactionId": result.transaction_id,
                },
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
