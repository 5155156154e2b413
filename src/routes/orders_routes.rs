use axum::{Router, routing::{get, post, put}};

use crate::{AppState, controllers::orders_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/orders/create", post(orders_controller::post_create_order))
        .route("/orders", get(orders_controller::get_all_orders))
        .route("/orders/:id", get(orders_controller::get_order_by_id))
        .route("/orders/:id/cancel", put(orders_controller::put_cancel_order))
}
