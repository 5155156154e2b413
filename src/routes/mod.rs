use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::{controllers::health_controller, AppState};

pub mod auth_routes;
pub mod orders_routes;
pub mod holdings_routes;
pub mod positions_routes;
pub mod funds_routes;
pub mod payment_routes;
pub mod watchlist_routes;
pub mod stocks_routes;
pub mod summary_routes;

fn cors(state: &AppState) -> CorsLayer {
    let origin = state
        .settings
        .allowed_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = auth_routes::add_routes(router);
    let router = orders_routes::add_routes(router);
    let router = holdings_routes::add_routes(router);
    let router = positions_routes::add_routes(router);
    let router = funds_routes::add_routes(router);
    let router = payment_routes::add_routes(router);
    let router = watchlist_routes::add_routes(router);
    let router = stocks_routes::add_routes(router);
    let router = summary_routes::add_routes(router);

    router
        .route("/health", get(health_controller::health))
        .layer(from_fn_with_state(state.clone(), crate::auth::require_auth))
        .layer(from_fn_with_state(state.clone(), crate::auth::inject_current_user))
        .layer(cors(&state))
        .with_state(state)
}
