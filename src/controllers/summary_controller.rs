use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::{models::CurrentUser, services::summary_service, AppState};

use super::unauthorized;

// GET /summary
pub async fn get_summary(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match summary_service::get_summary(&state, u.id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => e.into_response(),
    }
}
