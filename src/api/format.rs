use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::store::User;

/// Public view of a user. Which timestamps appear depends on the endpoint:
/// auth responses carry none, `/auth/me` adds `createdAt`, the profile
/// endpoints add both.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserView {
    pub fn summary(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_created(user: &User) -> Self {
        Self {
            created_at: Some(user.created_at),
            ..Self::summary(user)
        }
    }

    pub fn full(user: &User) -> Self {
        Self {
            created_at: Some(user.created_at),
            updated_at: Some(user.updated_at),
            ..Self::summary(user)
        }
    }
}
