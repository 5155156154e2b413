use std::sync::Arc;

use axum::{
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use mongodb::{bson::oid::ObjectId, Client};
use papertrade::models::CurrentUser;
use papertrade::{config, controllers::funds_controller, services, AppState};
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

fn json_request(uri: &str, body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
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
async fn post_add_funds_unauthorized_returns_401() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds/add", post(funds_controller::post_add_funds))
        .with_state(state);

    let req = json_request("/funds/add", r#"{"amount":1000}"#);

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_add_funds_missing_amount_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds/add", post(funds_controller::post_add_funds))
        .with_state(state);

    let mut req = json_request("/funds/add", r#"{}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Valid amount is required"));
}

#[tokio::test]
async fn post_add_funds_zero_amount_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds/add", post(funds_controller::post_add_funds))
        .with_state(state);

    let mut req = json_request("/funds/add", r#"{"amount":0}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_add_funds_negative_amount_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds/add", post(funds_controller::post_add_funds))
        .with_state(state);

    let mut req = json_request("/funds/add", r#"{"amount":-500}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_withdraw_unauthorized_returns_401() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds/withdraw", post(funds_controller::post_withdraw_funds))
        .with_state(state);

    let req = json_request("/funds/withdraw", r#"{"amount":100}"#);

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_withdraw_zero_amount_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds/withdraw", post(funds_controller::post_withdraw_funds))
        .with_state(state);

    let mut req = json_request("/funds/withdraw", r#"{"amount":0}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Valid withdrawal amount is required"));
}

#[tokio::test]
async fn post_withdraw_negative_amount_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds/withdraw", post(funds_controller::post_withdraw_funds))
        .with_state(state);

    let mut req = json_request("/funds/withdraw", r#"{"amount":-1}"#);
    req.extensions_mut().insert(test_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
