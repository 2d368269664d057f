use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` whose rejections use the API error envelope instead of axum's
/// plain-text 4xx responses. Syntax and type errors become 400; anything
/// else (oversized body, missing content type) keeps its own status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!("rejected request body: {}", rejection.body_text());
                match rejection {
                    // Unparseable or wrongly typed JSON is always a 400
                    JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                        Err(ApiError::invalid_json(rejection.body_text()))
                    }
                    other => Err(ApiError::rejected(other.status(), other.body_text())),
                }
            }
        }
    }
}
