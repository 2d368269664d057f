// handlers/public/system.rs - health, API info and the 404 fallback

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /health - process status and store sizes
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    let now = Utc::now();
    let counts = state.store.counts().await;

    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": now,
        "environment": state.config.environment.as_str(),
        "storageMode": state.config.storage.mode.as_str(),
        "uptimeSeconds": (now - state.started_at).num_seconds(),
        "counts": counts,
    }))
}

/// GET /api - endpoint map
pub async fn api_info() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "TaskFlow API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Demo task manager with intentionally weak security for scanner verification",
        "endpoints": {
            "auth": {
                "register": "POST /api/auth/register",
                "login": "POST /api/auth/login",
                "me": "GET /api/auth/me",
                "logout": "POST /api/auth/logout",
            },
            "tasks": {
                "list": "GET /api/tasks",
                "stats": "GET /api/tasks/stats",
                "get": "GET /api/tasks/:id",
                "create": "POST /api/tasks",
                "update": "PUT /api/tasks/:id",
                "delete": "DELETE /api/tasks/:id",
                "comments": "GET /api/tasks/:id/comments",
                "addComment": "POST /api/tasks/:id/comments",
                "deleteComment": "DELETE /api/tasks/:taskId/comments/:commentId",
            },
            "users": {
                "profile": "GET /api/users/profile",
                "updateProfile": "PUT /api/users/profile",
                "changePassword": "PUT /api/users/password",
                "deleteAccount": "DELETE /api/users/account",
                "uploadImage": "POST /api/users/profile/image",
            },
        },
    }))
}

/// Fallback for unmatched routes
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
