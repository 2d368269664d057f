use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::api::UserView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/auth/me - the account behind the session token
pub async fn me(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let user = state
        .store
        .find_user_by_id(auth.id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(json!({ "user": UserView::with_created(&user) })))
}
