use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{OwnerScope, GUEST_NAME};

/// Authenticated user context extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            email: claims.email,
        }
    }
}

/// Caller identity on routes where a session is optional.
#[derive(Clone, Debug)]
pub enum Caller {
    Guest,
    User(AuthUser),
}

impl Caller {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Caller::Guest => None,
            Caller::User(user) => Some(user),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user().map(|u| u.id)
    }

    pub fn display_name(&self) -> &str {
        match self {
            Caller::Guest => GUEST_NAME,
            Caller::User(user) => &user.username,
        }
    }

    /// Guests see ownerless tasks, users see their own.
    pub fn scope(&self) -> OwnerScope {
        match self {
            Caller::Guest => OwnerScope::Guest,
            Caller::User(user) => OwnerScope::User(user.id),
        }
    }
}

/// Rejects the request unless it carries a valid bearer token; injects [`AuthUser`].
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Access token required"))?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::warn!("token verification failed: {}", e);
        ApiError::from(e)
    })?;

    tracing::debug!(user_id = %claims.id, "authenticated request");
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Resolves the caller when a valid token is present and falls back to
/// [`Caller::Guest`] otherwise. Never rejects.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let caller = match extract_bearer_token(request.headers()) {
        Some(token) => match state.tokens.verify(&token) {
            Ok(claims) => Caller::User(AuthUser::from(claims)),
            Err(e) => {
                tracing::debug!("ignoring invalid token on optional route: {}", e);
                Caller::Guest
            }
        },
        None => Caller::Guest,
    };

    request.extensions_mut().insert(caller);
    next.run(request).await
}

/// Token after `Bearer ` in the Authorization header, if any.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
