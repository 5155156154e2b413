use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::{doc, oid::ObjectId};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth,
    error::AppError,
    models::User,
    services::auth_service,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SignupBody {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

// POST /auth/signup
pub async fn post_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupBody>,
) -> Response {
    let email = body.email.as_deref().map(str::trim).unwrap_or_default().to_string();
    let password = body.password.as_deref().unwrap_or_default().to_string();
    let username = body.username.as_deref().map(str::trim).unwrap_or_default().to_string();

    if email.is_empty() || password.is_empty() || username.is_empty() {
        return AppError::Validation("All fields required".to_string()).into_response();
    }
    if !auth_service::is_valid_email(&email) {
        return AppError::Validation("Invalid email".to_string()).into_response();
    }

    let user = match auth_service::register_user(&state, &username, &email, &password).await {
        Ok(u) => u,
        Err(e) => return e.into_response(),
    };

    let token = match auth_service::make_jwt(&state, &user.id, &user.username) {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };

    let jar = jar.add(auth_service::auth_cookie(&state, token.clone()));

    (
        StatusCode::CREATED,
        jar,
        Json(json!({
            "success": true,
            "message": "User signed up",
            "user": {
                "id": user.id.to_hex(),
                "username": user.username,
                "email": user.email,
            },
            "token": token,
        })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

// POST /auth/login
pub async fn post_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Response {
    let email = body.email.as_deref().map(str::trim).unwrap_or_default().to_string();
    let password = body.password.as_deref().unwrap_or_default().to_string();

    if email.is_empty() || password.is_empty() {
        return AppError::Validation("All fields required".to_string()).into_response();
    }

    let user = match auth_service::login_user(&state, &email, &password).await {
        Ok(u) => u,
        Err(e) => return e.into_response(),
    };

    let token = match auth_service::make_jwt(&state, &user.id, &user.username) {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };

    let jar = jar.add(auth_service::auth_cookie(&state, token.clone()));

    (
        StatusCode::OK,
        jar,
        Json(json!({
            "success": true,
            "message": "Logged in",
            "user": {
                "id": user.id.to_hex(),
                "username": user.username,
                "email": user.email,
            },
            "token": token,
        })),
    )
        .into_response()
}

// GET /auth/verify
//
// Never errors: a missing or bad token is just `{"status": false}`.
pub async fn get_verify(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = auth::extract_token(&headers, &state.settings.jwt_cookie_name) else {
        return Json(json!({ "status": false })).into_response();
    };

    let Some(claims) = auth::decode_claims(&state, &token) else {
        return Json(json!({ "status": false })).into_response();
    };

    let Ok(user_id) = ObjectId::parse_str(&claims.sub) else {
        return Json(json!({ "status": false })).into_response();
    };

    let users = state.db.collection::<User>("users");
    match users.find_one(doc! { "_id": user_id }, None).await {
        Ok(Some(user)) => Json(json!({
            "status": true,
            "user": {
                "id": user.id.to_hex(),
                "username": user.username,
                "email": user.email,
            },
        }))
        .into_response(),
        _ => Json(json!({ "status": false })).into_response(),
    }
}

// POST /auth/logout
pub async fn post_logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = jar.add(auth_service::clear_auth_cookie(&state));

    (
        jar,
        Json(json!({ "success": true, "message": "Logged out" })),
    )
        .into_response()
}
