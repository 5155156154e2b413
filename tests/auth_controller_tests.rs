use std::sync::Arc;

use axum::{
    http::{header, Request, StatusCode},
    routing::{get, post},
    Router,
};
use http_body_util::BodyExt;
use mongodb::Client;
use papertrade::{config, controllers::auth_controller, services, AppState};
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

#[tokio::test]
async fn post_signup_missing_fields_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/auth/signup", post(auth_controller::post_signup))
        .with_state(state);

    let req = json_request("/auth/signup", r#"{"email":"a@b.com"}"#);

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("All fields required"));
}

#[tokio::test]
async fn post_signup_invalid_email_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/auth/signup", post(auth_controller::post_signup))
        .with_state(state);

    let req = json_request(
        "/auth/signup",
        r#"{"email":"not-an-email","password":"secret","username":"tester"}"#,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Invalid email"));
}

#[tokio::test]
async fn post_login_missing_fields_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/auth/login", post(auth_controller::post_login))
        .with_state(state);

    let req = json_request("/auth/login", r#"{"email":"a@b.com"}"#);

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("All fields required"));
}

#[tokio::test]
async fn get_verify_without_token_reports_status_false() {
    let state = test_state().await;
    let app = Router::new()
        .route("/auth/verify", get(auth_controller::get_verify))
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/auth/verify")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains(r#""status":false"#));
}

#[tokio::test]
async fn get_verify_with_garbage_token_reports_status_false() {
    let state = test_state().await;
    let app = Router::new()
        .route("/auth/verify", get(auth_controller::get_verify))
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/auth/verify")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains(r#""status":false"#));
}

#[tokio::test]
async fn post_logout_clears_cookie() {
    let state = test_state().await;
    let cookie_name = state.settings.jwt_cookie_name.clone();

    let app = Router::new()
        .route("/auth/logout", post(auth_controller::post_logout))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let set_cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with(&format!("{cookie_name}=")));

    let body = response_body_string(res).await;
    assert!(body.contains("Logged out"));
}
