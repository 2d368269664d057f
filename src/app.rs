use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{guest, protected, public};
use crate::middleware::{jwt_auth_middleware, optional_auth_middleware, request_logging_middleware};
use crate::state::AppState;

/// Build the full router. Used by the server binary and the integration tests.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/health", get(public::health))
        .route("/api", get(public::api_info))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/tasks", task_routes(state.clone()))
        .nest("/api/users", user_routes(state.clone()))
        .fallback(public::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
                .layer(middleware::from_fn_with_state(state.clone(), request_logging_middleware)),
        )
        .with_state(state)
}

fn auth_routes(state: AppState) -> Router<AppState> {
    let session = Router::new()
        .route("/me", get(protected::me))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    Router::new()
        .route("/register", post(public::register))
        .route("/login", post(public::login))
        .route("/logout", post(public::logout))
        .merge(session)
}

fn task_routes(state: AppState) -> Router<AppState> {
    use guest::{comments, tasks};

    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route("/stats", get(tasks::stats))
        .route("/:id", get(tasks::get).put(tasks::update).delete(tasks::delete))
        .route("/:id/comments", get(comments::list).post(comments::create))
        .route("/:id/comments/:comment_id", delete(comments::delete))
        .route_layer(middleware::from_fn_with_state(state, optional_auth_middleware))
}

fn user_routes(state: AppState) -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/profile", get(users::profile).put(users::update_profile))
        .route("/profile/image", post(users::upload_image))
        .route("/password", put(users::change_password))
        .route("/account", delete(users::delete_account))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = config.security.cors_origin.as_str();
    if origin == "*" {
        return CorsLayer::permissive();
    }

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static("x-api-key"),
            ]),
        Err(e) => {
            tracing::warn!(%origin, "invalid CORS_ORIGIN ({}), allowing any origin", e);
            CorsLayer::permissive()
        }
    }
}
