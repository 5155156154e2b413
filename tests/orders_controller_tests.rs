use std::sync::Arc;

use axum::{
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use mongodb::{bson::oid::ObjectId, Client};
use papertrade::models::CurrentUser;
use papertrade::{config, controllers::orders_controller, services, AppState};
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

fn order_request(body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri("/orders/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

fn test_user() -> CurrentUser {
    CurrentUser {
        id: ObjectId::new(),
        email: "test@example.com".to_string(),
        username: "test".to_string(),
    }
}

#[tokio::test]
async fn post_create_order_unauthorized_returns_401() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let req = order_request(r#"{"name":"Apple","symbol":"AAPL","qty":1,"price":100,"mode":"BUY"}"#);

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = response_body_string(res).await;
    assert!(body.to_lowercase().contains("unauthorized"));
}

#[tokio::test]
async fn post_create_order_missing_fields_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let mut req = order_request(r#"{"symbol":"AAPL","qty":1}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Missing required fields"));
}

#[tokio::test]
async fn post_create_order_zero_qty_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let mut req =
        order_request(r#"{"name":"Apple","symbol":"AAPL","qty":0,"price":100,"mode":"BUY"}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("qty must be greater than zero"));
}

#[tokio::test]
async fn post_create_order_negative_qty_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let mut req =
        order_request(r#"{"name":"Apple","symbol":"AAPL","qty":-5,"price":100,"mode":"BUY"}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_create_order_negative_price_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let mut req =
        order_request(r#"{"name":"Apple","symbol":"AAPL","qty":1,"price":-10,"mode":"BUY"}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("price must be a non-negative number"));
}

#[tokio::test]
async fn post_create_order_invalid_mode_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let mut req =
        order_request(r#"{"name":"Apple","symbol":"AAPL","qty":1,"price":100,"mode":"HOLD"}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Mode must be either BUY or SELL"));
}

#[tokio::test]
async fn post_create_order_unknown_product_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let mut req = order_request(
        r#"{"name":"Apple","symbol":"AAPL","qty":1,"price":100,"mode":"BUY","product":"SPOT"}"#,
    );
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Unknown product"));
}

#[tokio::test]
async fn post_create_order_unknown_exchange_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/orders/create", post(orders_controller::post_create_order))
        .with_state(state);

    let mut req = order_request(
        r#"{"name":"Apple","symbol":"AAPL","qty":1,"price":100,"mode":"SELL","exchange":"NYSE"}"#,
    );
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Unknown exchange"));
}
