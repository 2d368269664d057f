use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::Session;
use crate::cli::utils::{output_empty_collection, output_success, output_value, print_stats, print_task_detail, task_line};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List visible tasks (own tasks when logged in, guest tasks otherwise)")]
    List {
        #[command(flatten)]
        filter: ListFilter,
    },

    #[command(about = "Show one task")]
    Show {
        #[arg(help = "Task id")]
        id: String,
    },

    #[command(about = "Create a task")]
    Create {
        #[arg(help = "Title")]
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },

    #[command(about = "Edit a task; only the given fields change")]
    Edit {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        #[arg(long, help = "Remove the due date", conflicts_with = "due")]
        clear_due: bool,
    },

    #[command(about = "Delete a task and its comments")]
    Delete {
        #[arg(help = "Task id")]
        id: String,
    },

    #[command(about = "Task counts by status and priority")]
    Stats,
}

#[derive(Args, Debug, Default)]
pub struct ListFilter {
    #[arg(long, help = "todo | in_progress | completed")]
    pub status: Option<String>,
    #[arg(long, help = "low | medium | high")]
    pub priority: Option<String>,
    #[arg(long, help = "Comma separated; matches tasks with any of them")]
    pub tags: Option<String>,
    #[arg(long, help = "Case-insensitive match on title and description")]
    pub search: Option<String>,
}

impl ListFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        [
            ("status", &self.status),
            ("priority", &self.priority),
            ("tags", &self.tags),
            ("search", &self.search),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

#[derive(Args, Debug, Default)]
pub struct TaskFields {
    #[arg(long, help = "Description")]
    pub description: Option<String>,
    #[arg(long, help = "todo | in_progress | completed")]
    pub status: Option<String>,
    #[arg(long, help = "low | medium | high")]
    pub priority: Option<String>,
    #[arg(long, help = "Due date (YYYY-MM-DD or RFC 3339)")]
    pub due: Option<String>,
    #[arg(long, value_delimiter = ',', help = "Comma separated tags")]
    pub tags: Option<Vec<String>>,
}

impl TaskFields {
    fn into_body(self, title: Option<String>) -> Value {
        let mut body = Map::new();
        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                body.insert(key.to_string(), value);
            }
        };

        set("title", title.map(Value::from));
        set("description", self.description.map(Value::from));
        set("status", self.status.map(Value::from));
        set("priority", self.priority.map(Value::from));
        set("dueDate", self.due.map(Value::from));
        set("tags", self.tags.map(|tags| json!(tags)));

        Value::Object(body)
    }
}

pub async fn handle(cmd: TaskCommands, session: Session, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::from_session(&session)?;

    match cmd {
        TaskCommands::List { filter } => {
            let response = client.get_query("/api/tasks", &filter.query()).await?;
            print_task_list(&output_format, &response)
        }
        TaskCommands::Show { id } => {
            let response = client.get(&format!("/api/tasks/{}", id)).await?;
            output_value(&output_format, &response, |response| {
                if let Some(task) = response.get("task") {
                    print_task_detail(task);
                }
            })
        }
        TaskCommands::Create { title, fields } => {
            let response = client.post("/api/tasks", &fields.into_body(Some(title))).await?;
            announce(&output_format, &response, "Task created")?;
            refresh(&client, &output_format).await
        }
        TaskCommands::Edit {
            id,
            title,
            fields,
            clear_due,
        } => {
            let mut body = fields.into_body(title);
            if clear_due {
                body["dueDate"] = Value::Null;
            }
            let response = client.put(&format!("/api/tasks/{}", id), &body).await?;
            announce(&output_format, &response, "Task updated")?;
            refresh(&client, &output_format).await
        }
        TaskCommands::Delete { id } => {
            let response = client.delete(&format!("/api/tasks/{}", id), None).await?;
            announce(&output_format, &response, "Task deleted")?;
            refresh(&client, &output_format).await
        }
        TaskCommands::Stats => {
            let response = client.get("/api/tasks/stats").await?;
            output_value(&output_format, &response, |response| {
                if let Some(stats) = response.get("stats") {
                    print_stats(stats);
                }
            })
        }
    }
}

fn announce(output_format: &OutputFormat, response: &Value, fallback: &str) -> anyhow::Result<()> {
    let message = response.get("message").and_then(Value::as_str).unwrap_or(fallback);
    let task = response.get("task").cloned();
    output_success(output_format, message, task.map(|task| json!({ "task": task })))
}

/// Re-fetch the list and stats after a mutation so the user sees the new state.
async fn refresh(client: &ApiClient, output_format: &OutputFormat) -> anyhow::Result<()> {
    let (tasks, stats) = tokio::try_join!(client.get("/api/tasks"), client.get("/api/tasks/stats"))?;
    print_task_list(output_format, &tasks)?;
    output_value(output_format, &stats, |stats| {
        if let Some(stats) = stats.get("stats") {
            print_stats(stats);
        }
    })
}

fn print_task_list(output_format: &OutputFormat, response: &Value) -> anyhow::Result<()> {
    let tasks = response.get("tasks").and_then(Value::as_array).cloned().unwrap_or_default();
    if tasks.is_empty() {
        return output_empty_collection(output_format, "tasks", "No tasks");
    }

    output_value(output_format, response, |_| {
        for task in &tasks {
            println!("{}", task_line(task));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_filter_only_sends_given_params() {
        let filter = ListFilter {
            status: Some("todo".into()),
            search: Some("milk".into()),
            ..ListFilter::default()
        };
        assert_eq!(filter.query(), vec![("status", "todo".to_string()), ("search", "milk".to_string())]);
    }

    #[test]
    fn task_fields_map_to_camel_case_body() {
        let fields = TaskFields {
            due: Some("2030-01-01".into()),
            tags: Some(vec!["a".into(), "b".into()]),
            ..TaskFields::default()
        };
        let body = fields.into_body(Some("Buy milk".into()));
        assert_eq!(body, json!({"title": "Buy milk", "dueDate": "2030-01-01", "tags": ["a", "b"]}));
    }
}
