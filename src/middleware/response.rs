use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Success response whose payload fields sit next to `"success": true`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub payload: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(payload: T) -> Self {
        Self {
            payload,
            status_code: None,
        }
    }

    pub fn with_status(payload: T, status_code: StatusCode) -> Self {
        Self {
            payload,
            status_code: Some(status_code),
        }
    }

    /// Create a 201 Created response
    pub fn created(payload: T) -> Self {
        Self::with_status(payload, StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let payload = match serde_json::to_value(&self.payload) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response payload: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = match payload {
            Value::Object(mut fields) => {
                fields.insert("success".to_string(), Value::Bool(true));
                Value::Object(fields)
            }
            Value::Null => json!({ "success": true }),
            other => json!({ "success": true, "data": other }),
        };

        (status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
