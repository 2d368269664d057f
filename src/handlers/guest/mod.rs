// handlers/guest/mod.rs - task and comment endpoints (session optional)
//
// Every route here runs behind `optional_auth_middleware`, so handlers
// receive a `Caller` that is either a guest or an authenticated user.
// Mutations do not check ownership.

pub mod comments;
pub mod tasks;
