use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::{save_session, Session};
use crate::cli::utils::{output_success, output_value, print_user};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and log in")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Short bio")]
        bio: Option<String>,
    },

    #[command(about = "Log in and cache the session token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Log out and forget the cached token")]
    Logout,

    #[command(about = "Show the account behind the cached token")]
    Whoami,

    #[command(about = "Show current server and login state")]
    Status,
}

pub async fn handle(cmd: AuthCommands, mut session: Session, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register {
            username,
            email,
            password,
            bio,
        } => {
            let client = ApiClient::new(&session.server, None)?;
            let response = client
                .post(
                    "/api/auth/register",
                    &json!({ "username": username, "email": email, "password": password, "bio": bio }),
                )
                .await?;
            start_session(&mut session, &response)?;

            output_success(
                &output_format,
                &format!("Registered and logged in as {}", username),
                Some(json!({ "user": response.get("user") })),
            )
        }
        AuthCommands::Login { username, password } => {
            let client = ApiClient::new(&session.server, None)?;
            let response = client
                .post("/api/auth/login", &json!({ "username": username, "password": password }))
                .await?;
            start_session(&mut session, &response)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", username),
                Some(json!({ "user": response.get("user") })),
            )
        }
        AuthCommands::Logout => {
            if session.is_authenticated() {
                // Tokens are stateless; the call only mirrors the web client.
                let client = ApiClient::from_session(&session)?;
                if let Err(e) = client.post("/api/auth/logout", &json!({})).await {
                    tracing::debug!("logout request failed: {}", e);
                }
            }
            session.sign_out();
            save_session(&session)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            super::require_login(&session)?;
            let client = ApiClient::from_session(&session)?;
            let response = client.get("/api/auth/me").await?;

            if let Some(user) = response.get("user") {
                session.user = Some(user.clone());
                save_session(&session)?;
            }

            output_value(&output_format, &response, |response| {
                if let Some(user) = response.get("user") {
                    print_user(user);
                }
            })
        }
        AuthCommands::Status => {
            let status = json!({
                "server": session.server,
                "authenticated": session.is_authenticated(),
                "username": session.username(),
            });
            output_value(&output_format, &status, |_| {
                println!("Server: {}", session.server);
                match session.username() {
                    Some(username) if session.is_authenticated() => println!("Logged in as {}", username),
                    _ if session.is_authenticated() => println!("Logged in"),
                    _ => println!("Not logged in (tasks are created as Guest)"),
                }
            })
        }
    }
}

fn start_session(session: &mut Session, response: &Value) -> anyhow::Result<()> {
    let token = response
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("server response did not include a token"))?;

    session.sign_in(token.to_string(), response.get("user").cloned());
    save_session(session)
}
