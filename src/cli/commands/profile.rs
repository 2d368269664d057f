use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::{save_session, Session};
use crate::cli::utils::{output_success, output_value, print_user};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your profile")]
    Show,

    #[command(about = "Update bio, email or avatar URL")]
    Update {
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },

    #[command(about = "Change your password")]
    Password {
        #[arg(help = "Current password")]
        current: String,
        #[arg(help = "New password")]
        new: String,
    },

    #[command(about = "Delete your account, tasks and comments")]
    Delete {
        #[arg(help = "Password confirmation")]
        password: String,
    },

    #[command(about = "Set your avatar from a data URL")]
    Image {
        #[arg(help = "Image data URL (data:image/...;base64,...)")]
        data: String,
    },
}

pub async fn handle(cmd: ProfileCommands, mut session: Session, output_format: OutputFormat) -> anyhow::Result<()> {
    super::require_login(&session)?;
    let client = ApiClient::from_session(&session)?;

    match cmd {
        ProfileCommands::Show => {
            let response = client.get("/api/users/profile").await?;
            output_value(&output_format, &response, |response| {
                if let Some(profile) = response.get("profile") {
                    print_user(profile);
                }
            })
        }
        ProfileCommands::Update { bio, email, avatar } => {
            let mut body = Map::new();
            for (key, value) in [("bio", bio), ("email", email), ("avatar", avatar)] {
                if let Some(value) = value {
                    body.insert(key.to_string(), Value::String(value));
                }
            }
            if body.is_empty() {
                return Err(anyhow::anyhow!("Nothing to update; pass --bio, --email or --avatar"));
            }

            let response = client.put("/api/users/profile", &Value::Object(body)).await?;
            if let Some(profile) = response.get("profile") {
                session.user = Some(profile.clone());
                save_session(&session)?;
            }
            output_success(
                &output_format,
                "Profile updated",
                Some(json!({ "profile": response.get("profile") })),
            )
        }
        ProfileCommands::Password { current, new } => {
            client
                .put(
                    "/api/users/password",
                    &json!({ "currentPassword": current, "newPassword": new }),
                )
                .await?;
            output_success(&output_format, "Password changed", None)
        }
        ProfileCommands::Delete { password } => {
            client
                .delete("/api/users/account", Some(&json!({ "password": password })))
                .await?;
            session.sign_out();
            save_session(&session)?;
            output_success(&output_format, "Account deleted", None)
        }
        ProfileCommands::Image { data } => {
            let response = client
                .post("/api/users/profile/image", &json!({ "imageData": data }))
                .await?;
            output_success(
                &output_format,
                "Profile image uploaded",
                Some(json!({ "avatar": response.get("avatar") })),
            )
        }
    }
}
