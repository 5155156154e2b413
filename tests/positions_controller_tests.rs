use std::sync::Arc;

use axum::{
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use mongodb::{bson::oid::ObjectId, Client};
use papertrade::models::CurrentUser;
use papertrade::{config, controllers::positions_controller, services, AppState};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let settings = config::load();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    AppState {
        db,
        quotes: services::quotes::QuoteClient::new(String::new()),
        stripe: services::payment_service::StripeClient::new(String::new()),
        price_cache: Arc::new(services::price_cache::PriceCache::new()),
        settings,
    }
}

async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn post_square_off_unauthorized_returns_401() {
    let state = test_state().await;
    let app = Router::new()
        .route("/positions/square-off", post(positions_controller::post_square_off))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/positions/square-off")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"symbol":"AAPL"}"#))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_square_off_missing_symbol_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/positions/square-off", post(positions_controller::post_square_off))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/positions/square-off")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"price":120.5}"#))
        .unwrap();

    req.extensions_mut().insert(CurrentUser {
        id: ObjectId::new(),
        email: "test@example.com".to_string(),
        username: "test".to_string(),
    });

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("symbol is required"));
}

#[tokio::test]
async fn post_square_off_blank_symbol_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/positions/square-off", post(positions_controller::post_square_off))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/positions/square-off")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"symbol":"   "}"#))
        .unwrap();

    req.extensions_mut().insert(CurrentUser {
        id: ObjectId::new(),
        email: "test@example.com".to_string(),
        username: "test".to_string(),
    });

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
