// handlers/mod.rs - handlers grouped by how much authentication they need
//
// public    - no session (register, login, logout, health, info)
// guest     - session optional; guests act on ownerless tasks (/api/tasks/*)
// protected - session required (/api/auth/me, /api/users/*)

pub mod guest;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// The value of a required string field, or `None` when absent or empty.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parse a path identifier; anything that is not a UUID cannot name a record.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_rejects_missing_and_empty() {
        assert_eq!(present(&Some("x".into())), Some("x"));
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&None), None);
    }

    #[test]
    fn non_uuid_ids_are_not_found() {
        let err = parse_id("42", "Task not found").unwrap_err();
        assert_eq!(err.message(), "Task not found");
        assert!(parse_id(&Uuid::new_v4().to_string(), "Task not found").is_ok());
    }
}
