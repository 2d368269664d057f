// handlers/protected/mod.rs - endpoints behind `jwt_auth_middleware`
//
// Handlers read the caller from the `AuthUser` extension. A token whose user
// has since been deleted still verifies, so each handler re-loads the user
// and answers 404 when it is gone.

pub mod session;
pub mod users;

pub use session::me;
