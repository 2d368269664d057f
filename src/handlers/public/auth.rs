// handlers/public/auth.rs - POST /api/auth/{register,login,logout}

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiJson, UserView};
use crate::error::ApiError;
use crate::handlers::present;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::store::NewUser;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/register - create an account and start a session
///
/// Only presence and a minimum password length are checked. Uniqueness is
/// checked against username first, then email.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<Value> {
    tracing::debug!(username = ?body.username, email = ?body.email, "registration attempt");

    let (Some(username), Some(email), Some(password)) =
        (present(&body.username), present(&body.email), present(&body.password))
    else {
        return Err(ApiError::bad_request("Username, email, and password are required"));
    };

    let min_length = state.config.security.password_min_length;
    if password.chars().count() < min_length {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            min_length
        )));
    }

    if state.store.find_user_by_username(username).await.is_some() {
        return Err(ApiError::conflict("Username already exists"));
    }
    if state.store.find_user_by_email(email).await.is_some() {
        return Err(ApiError::conflict("Email already exists"));
    }

    let user = state
        .store
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            bio: body.bio,
            avatar: None,
        })
        .await?;

    let token = state.tokens.issue(&user)?;

    Ok(ApiResponse::created(json!({
        "message": "User registered successfully",
        "token": token,
        "user": UserView::summary(&user),
    })))
}

/// POST /api/auth/login - exchange credentials for a session token
///
/// Unknown usernames and wrong passwords produce different messages.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Value> {
    let (Some(username), Some(password)) = (present(&body.username), present(&body.password)) else {
        return Err(ApiError::bad_request("Username and password are required"));
    };

    let Some(user) = state.store.find_user_by_username(username).await else {
        tracing::warn!(%username, "login for unknown user");
        return Err(ApiError::unauthorized("User not found"));
    };

    if !state.store.verify_password(&user, password).await? {
        tracing::warn!(%username, "login with wrong password");
        return Err(ApiError::unauthorized("Invalid password"));
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = %user.id, "login successful");

    Ok(ApiResponse::success(json!({
        "message": "Login successful",
        "token": token,
        "user": UserView::summary(&user),
    })))
}

/// POST /api/auth/logout - sessions are stateless; the client drops its token
pub async fn logout() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "message": "Logout successful" }))
}
