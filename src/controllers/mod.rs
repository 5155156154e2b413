use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub mod auth_controller;
pub mod orders_controller;
pub mod holdings_controller;
pub mod positions_controller;
pub mod funds_controller;
pub mod payment_controller;
pub mod watchlist_controller;
pub mod stocks_controller;
pub mod summary_controller;
pub mod health_controller;

/// 401 for handlers reached without an authenticated user. The auth layer
/// normally rejects these earlier; this also covers tests that exercise
/// controllers without the middleware stack.
pub(crate) fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Unauthorized" })),
    )
        .into_response()
}
