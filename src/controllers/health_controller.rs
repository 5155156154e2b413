use axum::{extract::State, response::{IntoResponse, Response}, Json};
use mongodb::bson::doc;
use serde_json::json;

use crate::AppState;

// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    let db_ok = state
        .db
        .run_command(doc! { "ping": 1 }, None)
        .await
        .is_ok();

    Json(json!({ "status": "ok", "db": db_ok })).into_response()
}
