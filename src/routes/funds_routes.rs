use axum::{Router, routing::{get, post}};

use crate::{AppState, controllers::funds_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/funds/my-funds", get(funds_controller::get_my_funds))
        .route("/funds/add", post(funds_controller::post_add_funds))
        .route("/funds/withdraw", post(funds_controller::post_withdraw_funds))
}
