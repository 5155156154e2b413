use axum::{Router, routing::{get, post}};

use crate::{AppState, controllers::payment_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/payment/create-payment-intent",
            post(payment_controller::post_create_payment_intent),
        )
        .route(
            "/payment/payment-intent/:id",
            get(payment_controller::get_payment_intent),
        )
}
