use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SERVER: &str = "http://localhost:3001";

/// Cached client session, stored as `session.json` in the config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Last user profile returned by the server.
    #[serde(default)]
    pub user: Option<Value>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            token: None,
            user: None,
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref()?.get("username")?.as_str()
    }

    pub fn sign_in(&mut self, token: String, user: Option<Value>) {
        self.token = Some(token);
        self.user = user;
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TASKFLOW_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("taskflow")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Session> {
    let session_file = get_config_dir()?.join("session.json");

    if !session_file.exists() {
        return Ok(Session::default());
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join("session.json");

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn old_session_files_without_token_still_load() {
        let session: Session = serde_json::from_str(r#"{"server":"http://example.test"}"#).unwrap();
        assert_eq!(session.server, "http://example.test");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn sign_in_and_out_update_cached_user() {
        let mut session = Session::default();
        session.sign_in("tok".into(), Some(json!({"username": "testuser"})));
        assert!(session.is_authenticated());
        assert_eq!(session.username(), Some("testuser"));

        session.sign_out();
        assert!(session.token.is_none());
        assert!(session.username().is_none());
        assert_eq!(session.server, DEFAULT_SERVER);
    }
}
