use axum::extract::{Extension, Path, Query, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::ApiJson;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;
use crate::store::{
    deserialize_due_date, deserialize_due_date_change, NewTask, TaskChanges, TaskFilter, TaskPriority,
    TaskStatus,
};

const TASK_NOT_FOUND: &str = "Task not found";

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Comma separated
    pub tags: Option<String>,
    pub search: Option<String>,
}

impl TaskListQuery {
    fn into_filter(self, caller: &Caller) -> Result<TaskFilter, ApiError> {
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(s.parse::<TaskStatus>().map_err(ApiError::bad_request)?),
            None => None,
        };
        let priority = match self.priority.as_deref().filter(|s| !s.is_empty()) {
            Some(p) => Some(p.parse::<TaskPriority>().map_err(ApiError::bad_request)?),
            None => None,
        };
        let tags = self
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(TaskFilter {
            owner: caller.scope(),
            status,
            priority,
            tags,
            search: self.search,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Absent leaves the due date alone; `null` clears it.
    #[serde(default, deserialize_with = "deserialize_due_date_change")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
            tags: req.tags,
        }
    }
}

/// GET /api/tasks - the caller's tasks (guests get ownerless ones), newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Value> {
    let filter = query.into_filter(&caller)?;
    tracing::debug!(?filter, "listing tasks");

    let tasks = state.store.list_tasks(filter).await;

    Ok(ApiResponse::success(json!({
        "count": tasks.len(),
        "tasks": tasks,
    })))
}

/// GET /api/tasks/stats
pub async fn stats(State(state): State<AppState>, Extension(caller): Extension<Caller>) -> ApiResponse<Value> {
    let stats = state.store.stats(caller.scope()).await;
    ApiResponse::success(json!({ "stats": stats }))
}

/// GET /api/tasks/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id, TASK_NOT_FOUND)?;
    let task = state
        .store
        .get_task(id)
        .await
        .ok_or_else(|| ApiError::not_found(TASK_NOT_FOUND))?;

    Ok(ApiResponse::success(json!({ "task": task })))
}

/// POST /api/tasks - owned by the caller, or a guest task without a session
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateTaskRequest>,
) -> ApiResult<Value> {
    let title = match body.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err(ApiError::bad_request("Task title is required")),
    };

    let task = state
        .store
        .create_task(NewTask {
            title,
            description: body.description,
            status: body.status,
            priority: body.priority,
            due_date: body.due_date,
            tags: body.tags,
            user_id: caller.user_id(),
            created_by: Some(caller.display_name().to_string()),
        })
        .await;

    Ok(ApiResponse::created(json!({
        "message": "Task created successfully",
        "task": task,
    })))
}

/// PUT /api/tasks/:id - partial update; any caller may edit any task
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Value> {
    let id = parse_id(&id, TASK_NOT_FOUND)?;
    tracing::debug!(task_id = %id, caller = caller.display_name(), "updating task");

    let task = state
        .store
        .update_task(id, body.into())
        .await
        .ok_or_else(|| ApiError::not_found(TASK_NOT_FOUND))?;

    Ok(ApiResponse::success(json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// DELETE /api/tasks/:id - removes the task and its comments; no ownership check
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, TASK_NOT_FOUND)?;

    if !state.store.delete_task(id).await {
        return Err(ApiError::not_found(TASK_NOT_FOUND));
    }
    tracing::info!(task_id = %id, caller = caller.display_name(), "task deleted");

    Ok(ApiResponse::success(json!({ "message": "Task deleted successfully" })))
}
