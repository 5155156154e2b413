use axum_extra::extract::cookie::{Cookie, SameSite};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::{doc, oid::ObjectId};
use regex::Regex;

use crate::{
    auth::Claims,
    error::{AppError, Result},
    models::User,
    AppState,
};

const TOKEN_DAYS: i64 = 3;

pub fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    re.is_match(email)
}

pub fn make_jwt(state: &AppState, user_id: &ObjectId, username: &str) -> Result<String> {
    let exp = (Utc::now() + Duration::days(TOKEN_DAYS)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_hex(),
        username: username.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn auth_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(state.settings.jwt_cookie_name.clone(), token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if state.settings.cookie_secure {
        cookie.set_secure(true);
    }
    cookie
}

pub fn clear_auth_cookie(state: &AppState) -> Cookie<'static> {
    let mut cookie = Cookie::new(state.settings.jwt_cookie_name.clone(), "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.make_removal();
    cookie
}

pub async fn login_user(state: &AppState, email: &str, password: &str) -> Result<User> {
    let users = state.db.collection::<User>("users");

    let user = users
        .find_one(doc! { "email": email }, None)
        .await?
        .ok_or_else(|| AppError::Validation("Incorrect email or password".to_string()))?;

    if !verify(password, &user.password_hash).unwrap_or(false) {
        return Err(AppError::Validation("Incorrect email or password".to_string()));
    }

    Ok(user)
}

pub async fn register_user(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User> {
    let users = state.db.collection::<User>("users");

    if users.find_one(doc! { "email": email }, None).await?.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let password_hash =
        hash(password, DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User {
        id: ObjectId::new(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash,
    };

    users.insert_one(&user, None).await?;

    Ok(user)
}
