use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::Session;
use crate::cli::utils::{output_empty_collection, output_success, output_value, str_field};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum CommentCommands {
    #[command(about = "List comments on a task, oldest first")]
    List {
        #[arg(help = "Task id")]
        task: String,
    },

    #[command(about = "Comment on a task")]
    Add {
        #[arg(help = "Task id")]
        task: String,
        #[arg(help = "Comment text")]
        content: String,
    },

    #[command(about = "Delete a comment")]
    Delete {
        #[arg(help = "Task id")]
        task: String,
        #[arg(help = "Comment id")]
        comment: String,
    },
}

pub async fn handle(cmd: CommentCommands, session: Session, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::from_session(&session)?;

    match cmd {
        CommentCommands::List { task } => {
            let response = client.get(&format!("/api/tasks/{}/comments", task)).await?;
            let comments = response.get("comments").and_then(Value::as_array).cloned().unwrap_or_default();
            if comments.is_empty() {
                return output_empty_collection(&output_format, "comments", "No comments");
            }

            output_value(&output_format, &response, |_| {
                for comment in &comments {
                    println!(
                        "{}  {}  {}: {}",
                        str_field(comment, "id"),
                        str_field(comment, "createdAt"),
                        str_field(comment, "username"),
                        str_field(comment, "content"),
                    );
                }
            })
        }
        CommentCommands::Add { task, content } => {
            let response = client
                .post(&format!("/api/tasks/{}/comments", task), &json!({ "content": content }))
                .await?;
            output_success(
                &output_format,
                "Comment added",
                Some(json!({ "comment": response.get("comment") })),
            )
        }
        CommentCommands::Delete { task, comment } => {
            client
                .delete(&format!("/api/tasks/{}/comments/{}", task, comment), None)
                .await?;
            output_success(&output_format, "Comment deleted", None)
        }
    }
}
