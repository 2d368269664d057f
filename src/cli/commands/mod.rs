pub mod auth;
pub mod comment;
pub mod profile;
pub mod server;
pub mod task;

use crate::cli::config::Session;

/// Fail early with a helpful message when a command needs a logged-in session.
pub(crate) fn require_login(session: &Session) -> anyhow::Result<()> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Not logged in. Run `taskflow auth login <username> --password <password>` first"))
    }
}
