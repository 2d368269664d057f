pub mod auth;
pub mod logging;
pub mod response;

pub use auth::{jwt_auth_middleware, optional_auth_middleware, AuthUser, Caller};
pub use logging::request_logging_middleware;
pub use response::{ApiResponse, ApiResult};
