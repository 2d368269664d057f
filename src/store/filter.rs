use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Task, TaskPriority, TaskStatus};

/// Which tasks a listing or stats call may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerScope {
    /// Every task regardless of owner.
    #[default]
    Any,
    /// Ownerless (guest) tasks only.
    Guest,
    /// Tasks owned by this user only; guest tasks are excluded.
    User(Uuid),
}

impl OwnerScope {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            OwnerScope::Any => true,
            OwnerScope::Guest => task.user_id.is_none(),
            OwnerScope::User(id) => task.user_id == Some(*id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub owner: OwnerScope,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// A task matches when it carries at least one of these tags.
    pub tags: Vec<String>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn for_owner(owner: OwnerScope) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    /// Filter and sort a snapshot of tasks. Filters apply in a fixed order:
    /// owner, status, priority, tags, search. The result is newest first.
    pub fn apply<'a, I>(&self, tasks: I) -> Vec<Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let search = self
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<Task> = tasks
            .into_iter()
            .filter(|t| self.owner.matches(t))
            .filter(|t| self.status.map_or(true, |s| t.status == s))
            .filter(|t| self.priority.map_or(true, |p| t.priority == p))
            .filter(|t| self.tags.is_empty() || t.tags.iter().any(|tag| self.tags.contains(tag)))
            .filter(|t| match &search {
                Some(needle) => {
                    t.title.to_lowercase().contains(needle)
                        || t.description.to_lowercase().contains(needle)
                }
                None => true,
            })
            .cloned()
            .collect();

        // stable, so equal timestamps keep insertion order
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: usize,
    pub todo_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
    pub high_priority_tasks: usize,
    pub overdue_tasks: usize,
}

impl TaskStats {
    pub fn compute<'a, I>(tasks: I, scope: OwnerScope, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut stats = TaskStats::default();
        for task in tasks.into_iter().filter(|t| scope.matches(t)) {
            stats.total_tasks += 1;
            match task.status {
                TaskStatus::Todo => stats.todo_tasks += 1,
                TaskStatus::InProgress => stats.in_progress_tasks += 1,
                TaskStatus::Completed => stats.completed_tasks += 1,
            }
            if task.priority == TaskPriority::High {
                stats.high_priority_tasks += 1;
            }
            if task.is_overdue(now) {
                stats.overdue_tasks += 1;
            }
        }
        stats
    }
}
