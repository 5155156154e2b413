use axum::{Router, routing::{delete, get, post}};

use crate::{AppState, controllers::watchlist_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/watchlist", get(watchlist_controller::get_watchlist))
        .route("/watchlist/add", post(watchlist_controller::post_add_to_watchlist))
        .route("/watchlist/:symbol", delete(watchlist_controller::delete_from_watchlist))
}
