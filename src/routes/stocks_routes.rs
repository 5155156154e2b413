use axum::{Router, routing::get};

use crate::{AppState, controllers::stocks_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/stocks/search", get(stocks_controller::get_search))
        .route("/stocks/price", get(stocks_controller::get_price))
        .route("/indices", get(stocks_controller::get_indices))
}
