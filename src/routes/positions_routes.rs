use axum::{Router, routing::{get, post}};

use crate::{AppState, controllers::positions_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/positions", get(positions_controller::get_all_positions))
        .route("/positions/square-off", post(positions_controller::post_square_off))
        .route("/positions/:symbol", get(positions_controller::get_position_by_symbol))
}
