use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::User;

/// Identity claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt expired")]
    Expired,

    #[error("jwt malformed")]
    Malformed,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("token expiry of {0} hours is out of range")]
    InvalidExpiry(u64),

    #[error("token generation failed: {0}")]
    Generation(String),

    #[error("{0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                TokenError::Malformed
            }
            _ => TokenError::Invalid(err.to_string()),
        }
    }
}

/// Signs and verifies HS256 session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("expiry", &self.expiry).finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: i64::try_from(expiry_hours)
                .ok()
                .and_then(Duration::try_hours)
                .ok_or(TokenError::InvalidExpiry(expiry_hours))?,
        })
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.expiry)
            .ok_or_else(|| TokenError::Generation("token expiry overflows the calendar".to_string()))?;
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
        };

        tracing::debug!(user_id = %user.id, "issuing session token");
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: String::new(),
            bio: String::new(),
            avatar: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies_with_claims() {
        let issuer = TokenIssuer::new("secret123", 24).unwrap();
        let user = user();
        let token = issuer.issue(&user).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn rejects_token_signed_with_another_secret() {
        let token = TokenIssuer::new("one", 24).unwrap().issue(&user()).unwrap();
        let err = TokenIssuer::new("two", 24).unwrap().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature), "got {err:?}");
    }

    #[test]
    fn rejects_expired_token() {
        let issuer = TokenIssuer::new("secret123", 24).unwrap();
        let now = Utc::now();
        let claims = Claims {
            id: Uuid::new_v4(),
            username: "old".into(),
            email: "old@example.com".into(),
            exp: (now - Duration::hours(1)).timestamp(),
            iat: (now - Duration::hours(25)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret123")).unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn rejects_garbage() {
        let issuer = TokenIssuer::new("secret123", 24).unwrap();
        assert!(matches!(issuer.verify("not-a-token"), Err(TokenError::Malformed)));
    }

    #[test]
    fn out_of_range_expiry_is_refused() {
        assert!(matches!(
            TokenIssuer::new("secret123", u64::MAX),
            Err(TokenError::InvalidExpiry(u64::MAX))
        ));
        assert!(matches!(
            TokenIssuer::new("secret123", 10_000_000_000_000),
            Err(TokenError::InvalidExpiry(_))
        ));
    }

    #[test]
    fn expiry_past_the_calendar_fails_to_issue() {
        // Representable as a Duration but not as a timestamp from now
        let issuer = TokenIssuer::new("secret123", 10_000_000_000).unwrap();
        assert!(matches!(issuer.issue(&user()), Err(TokenError::Generation(_))));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(TokenIssuer::new("", 24), Err(TokenError::MissingSecret)));
    }
}
