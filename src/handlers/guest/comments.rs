// handlers/guest/comments.rs - /api/tasks/:id/comments

use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::error::ApiError;
use crate::handlers::{parse_id, present};
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;
use crate::store::NewComment;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(alias = "text")]
    pub content: Option<String>,
}

/// GET /api/tasks/:id/comments - oldest first; unknown tasks yield an empty list
pub async fn list(State(state): State<AppState>, Path(task_id): Path<String>) -> ApiResponse<Value> {
    let comments = match Uuid::parse_str(&task_id) {
        Ok(id) => state.store.comments_for_task(id).await,
        Err(_) => Vec::new(),
    };

    ApiResponse::success(json!({
        "count": comments.len(),
        "comments": comments,
    }))
}

/// POST /api/tasks/:id/comments
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
    ApiJson(body): ApiJson<CreateCommentRequest>,
) -> ApiResult<Value> {
    let content = match present(&body.content) {
        Some(content) if !content.trim().is_empty() => content.to_string(),
        _ => return Err(ApiError::bad_request("Comment text is required")),
    };

    let task_id = parse_id(&task_id, "Task not found")?;
    if state.store.get_task(task_id).await.is_none() {
        return Err(ApiError::not_found("Task not found"));
    }

    let avatar = match caller.user_id() {
        Some(id) => state.store.find_user_by_id(id).await.map(|u| u.avatar),
        None => None,
    };

    let comment = state
        .store
        .create_comment(NewComment {
            task_id,
            user_id: caller.user_id(),
            username: Some(caller.display_name().to_string()),
            avatar,
            content,
        })
        .await;

    Ok(ApiResponse::created(json!({
        "message": "Comment created successfully",
        "comment": comment,
    })))
}

/// DELETE /api/tasks/:taskId/comments/:commentId
///
/// The comment is removed by id alone; the task segment is not checked.
pub async fn delete(
    State(state): State<AppState>,
    Path((_task_id, comment_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let comment_id = parse_id(&comment_id, "Comment not found")?;

    if !state.store.delete_comment(comment_id).await {
        return Err(ApiError::not_found("Comment not found"));
    }

    Ok(ApiResponse::success(json!({ "message": "Comment deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_body_accepts_text_alias() {
        let body: CreateCommentRequest = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(body.content.as_deref(), Some("hi"));

        let body: CreateCommentRequest = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert_eq!(body.content.as_deref(), Some("hello"));
    }
}
