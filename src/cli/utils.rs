use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".into(), json!(true));
            response.insert("message".into(), json!(message));

            if let Some(Value::Object(fields)) = data {
                response.extend(fields);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a raw server response in JSON mode, or run `render` in text mode.
pub fn output_value(output_format: &OutputFormat, value: &Value, render: impl FnOnce(&Value)) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => render(value),
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// One line per task: id, status, priority, title, due date and tags.
pub fn task_line(task: &Value) -> String {
    let mut line = format!(
        "{}  [{}] ({}) {}",
        str_field(task, "id"),
        str_field(task, "status"),
        str_field(task, "priority"),
        str_field(task, "title"),
    );

    if let Some(due) = task.get("dueDate").and_then(Value::as_str) {
        line.push_str(&format!("  due {}", due.get(..10).unwrap_or(due)));
    }

    let tags: Vec<&str> = task
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !tags.is_empty() {
        line.push_str(&format!("  #{}", tags.join(" #")));
    }

    line
}

pub fn print_task_detail(task: &Value) {
    println!("{}", str_field(task, "title"));
    println!("  id:          {}", str_field(task, "id"));
    println!("  status:      {}", str_field(task, "status"));
    println!("  priority:    {}", str_field(task, "priority"));
    println!("  created by:  {}", str_field(task, "createdBy"));
    if let Some(due) = task.get("dueDate").and_then(Value::as_str) {
        println!("  due:         {}", due);
    }
    let description = str_field(task, "description");
    if !description.is_empty() {
        println!("  description: {}", description);
    }
}

pub fn print_stats(stats: &Value) {
    let count = |key: &str| stats.get(key).and_then(Value::as_u64).unwrap_or(0);
    println!(
        "Total {}  |  todo {}  in progress {}  completed {}  |  high priority {}  overdue {}",
        count("totalTasks"),
        count("todoTasks"),
        count("inProgressTasks"),
        count("completedTasks"),
        count("highPriorityTasks"),
        count("overdueTasks"),
    );
}

pub fn print_user(user: &Value) {
    println!("{} <{}>", str_field(user, "username"), str_field(user, "email"));
    println!("  id:     {}", str_field(user, "id"));
    let bio = str_field(user, "bio");
    if !bio.is_empty() {
        println!("  bio:    {}", bio);
    }
    println!("  avatar: {}", str_field(user, "avatar"));
    if let Some(created) = user.get("createdAt").and_then(Value::as_str) {
        println!("  joined: {}", created);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_line_includes_due_date_and_tags() {
        let task = json!({
            "id": "abc",
            "title": "Buy milk",
            "status": "todo",
            "priority": "medium",
            "dueDate": "2030-05-01T00:00:00Z",
            "tags": ["home", "errand"],
        });
        assert_eq!(task_line(&task), "abc  [todo] (medium) Buy milk  due 2030-05-01  #home #errand");
    }

    #[test]
    fn task_line_without_optional_fields() {
        let task = json!({"id": "abc", "title": "t", "status": "completed", "priority": "low", "dueDate": null, "tags": []});
        assert_eq!(task_line(&task), "abc  [completed] (low) t");
    }
}
