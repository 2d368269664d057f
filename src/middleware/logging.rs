use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Per-request access log, enabled by `api.enable_request_logging`.
/// Credentials and bodies are never logged.
pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.api.enable_request_logging {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let authenticated = request.headers().contains_key(axum::http::header::AUTHORIZATION);
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        authenticated,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    response
}
