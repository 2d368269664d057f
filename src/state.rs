use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::{TokenError, TokenIssuer};
use crate::config::AppConfig;
use crate::store::Storage;

/// Shared handler state. Cloned per request; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Storage>,
    pub tokens: TokenIssuer,
    pub config: Arc<AppConfig>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Storage>) -> Result<Self, TokenError> {
        let tokens = TokenIssuer::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;

        Ok(Self {
            store,
            tokens,
            config: Arc::new(config),
            started_at: Utc::now(),
        })
    }
}
