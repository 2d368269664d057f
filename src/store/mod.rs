// Record store: users, tasks and comments.
//
// Handlers only ever see `dyn Storage`; the in-memory implementation is the
// only backend.

pub mod filter;
pub mod memory;
pub mod models;
mod seed;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use filter::{OwnerScope, TaskFilter, TaskStats};
pub use memory::MemoryStore;
pub use models::*;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreCounts {
    pub users: usize,
    pub tasks: usize,
    pub comments: usize,
}

#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_username(&self, username: &str) -> Option<User>;
    async fn find_user_by_email(&self, email: &str) -> Option<User>;
    async fn find_user_by_id(&self, id: Uuid) -> Option<User>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;
    /// Removes the user, their tasks, and those tasks' comments.
    async fn delete_user(&self, id: Uuid) -> bool;
    async fn verify_password(&self, user: &User, candidate: &str) -> StoreResult<bool>;

    // Tasks
    async fn list_tasks(&self, filter: TaskFilter) -> Vec<Task>;
    async fn get_task(&self, id: Uuid) -> Option<Task>;
    async fn create_task(&self, task: NewTask) -> Task;
    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Option<Task>;
    /// Removes the task and its comments.
    async fn delete_task(&self, id: Uuid) -> bool;
    async fn stats(&self, scope: OwnerScope) -> TaskStats;

    // Comments
    async fn comments_for_task(&self, task_id: Uuid) -> Vec<Comment>;
    async fn create_comment(&self, comment: NewComment) -> Comment;
    async fn delete_comment(&self, id: Uuid) -> bool;

    async fn counts(&self) -> StoreCounts;
}
