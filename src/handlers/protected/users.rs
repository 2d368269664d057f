// handlers/protected/users.rs - /api/users/* profile management

use axum::extract::{Extension, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiJson, UserView};
use crate::error::ApiError;
use crate::handlers::present;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::store::{User, UserChanges};

const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageRequest {
    pub image_data: Option<String>,
}

async fn load_user(state: &AppState, auth: &AuthUser) -> Result<User, ApiError> {
    state
        .store
        .find_user_by_id(auth.id)
        .await
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
}

/// GET /api/users/profile
pub async fn profile(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let user = load_user(&state, &auth).await?;
    Ok(ApiResponse::success(json!({ "profile": UserView::full(&user) })))
}

/// PUT /api/users/profile - bio, email and avatar; absent fields are kept, empty strings are stored
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Value> {
    let user = load_user(&state, &auth).await?;

    // Only a non-empty email is checked for uniqueness, but any given value is stored
    if let Some(email) = present(&body.email) {
        if let Some(other) = state.store.find_user_by_email(email).await {
            if other.id != user.id {
                return Err(ApiError::conflict("Email already in use"));
            }
        }
    }

    let changes = UserChanges {
        email: body.email,
        bio: body.bio,
        avatar: body.avatar,
        ..UserChanges::default()
    };
    let updated = state
        .store
        .update_user(user.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    tracing::info!(user_id = %updated.id, "profile updated");

    Ok(ApiResponse::success(json!({
        "message": "Profile updated successfully",
        "profile": UserView::summary(&updated),
    })))
}

/// PUT /api/users/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Value> {
    let (Some(current), Some(new_password)) = (present(&body.current_password), present(&body.new_password))
    else {
        return Err(ApiError::bad_request("Current password and new password are required"));
    };

    let min_length = state.config.security.password_min_length;
    if new_password.chars().count() < min_length {
        return Err(ApiError::bad_request(format!(
            "New password must be at least {} characters",
            min_length
        )));
    }

    let user = load_user(&state, &auth).await?;
    if !state.store.verify_password(&user, current).await? {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    state
        .store
        .update_user(
            user.id,
            UserChanges {
                password: Some(new_password.to_string()),
                ..UserChanges::default()
            },
        )
        .await?;

    tracing::info!(user_id = %user.id, "password changed");
    Ok(ApiResponse::success(json!({ "message": "Password changed successfully" })))
}

/// DELETE /api/users/account - confirmed by password; removes owned tasks and their comments
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    body: Option<ApiJson<DeleteAccountRequest>>,
) -> ApiResult<Value> {
    let password = body.and_then(|ApiJson(body)| body.password).filter(|p| !p.is_empty());
    let Some(password) = password else {
        return Err(ApiError::bad_request("Password is required to delete account"));
    };

    let user = load_user(&state, &auth).await?;
    if !state.store.verify_password(&user, &password).await? {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    if !state.store.delete_user(user.id).await {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    tracing::info!(user_id = %user.id, "account deleted");

    Ok(ApiResponse::success(json!({ "message": "Account deleted successfully" })))
}

/// POST /api/users/profile/image - stores the data URL verbatim as the avatar
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<ProfileImageRequest>,
) -> ApiResult<Value> {
    let Some(image) = present(&body.image_data) else {
        return Err(ApiError::bad_request("Image data is required"));
    };

    let user = load_user(&state, &auth).await?;
    let updated = state
        .store
        .update_user(
            user.id,
            UserChanges {
                avatar: Some(image.to_string()),
                ..UserChanges::default()
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(ApiResponse::success(json!({
        "message": "Profile image uploaded successfully",
        "avatar": updated.avatar,
    })))
}
