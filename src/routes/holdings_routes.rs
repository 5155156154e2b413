use axum::{Router, routing::{delete, get, post, put}};

use crate::{AppState, controllers::holdings_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/holdings", get(holdings_controller::get_all_holdings))
        .route("/holdings", post(holdings_controller::post_add_holding))
        .route("/holdings/:id", put(holdings_controller::put_update_holding))
        .route("/holdings/:id", delete(holdings_controller::delete_holding))
}
