use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::config::Session;
use crate::cli::utils::{output_value, str_field};
use crate::cli::OutputFormat;

/// `taskflow health` - GET /health
pub async fn health(session: Session, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(&session.server, None)?;
    let response = client.get("/health").await?;

    output_value(&output_format, &response, |health| {
        println!("{} is {}", session.server, str_field(health, "status"));
        println!("  environment: {}", str_field(health, "environment"));
        println!("  storage:     {}", str_field(health, "storageMode"));
        if let Some(uptime) = health.get("uptimeSeconds").and_then(Value::as_i64) {
            println!("  uptime:      {}s", uptime);
        }
        if let Some(counts) = health.get("counts") {
            let count = |key: &str| counts.get(key).and_then(Value::as_u64).unwrap_or(0);
            println!(
                "  records:     {} users, {} tasks, {} comments",
                count("users"),
                count("tasks"),
                count("comments")
            );
        }
    })
}

/// `taskflow info` - GET /api
pub async fn info(session: Session, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(&session.server, None)?;
    let response = client.get("/api").await?;

    output_value(&output_format, &response, |info| {
        println!("{} {}", str_field(info, "name"), str_field(info, "version"));
        let Some(groups) = info.get("endpoints").and_then(Value::as_object) else {
            return;
        };
        for (group, endpoints) in groups {
            println!("{}:", group);
            if let Some(endpoints) = endpoints.as_object() {
                for endpoint in endpoints.values().filter_map(Value::as_str) {
                    println!("  {}", endpoint);
                }
            }
        }
    })
}
