use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::filter::{OwnerScope, TaskFilter, TaskStats};
use super::models::*;
use super::{Storage, StoreCounts, StoreResult};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

/// Process-local store. All three collections sit behind one lock so that
/// cascading deletes are atomic.
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<Collections>,
    bcrypt_cost: u32,
}

impl MemoryStore {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            data: RwLock::new(Collections::default()),
            bcrypt_cost,
        }
    }

    pub(super) async fn hash_password(&self, password: &str) -> StoreResult<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    pub(super) async fn insert_user(&self, user: User) {
        self.data.write().await.users.push(user);
    }

    pub(super) async fn insert_task(&self, task: Task) {
        self.data.write().await.tasks.push(task);
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let password = self.hash_password(&new.password).await?;
        let now = Utc::now();
        let avatar = new
            .avatar
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| User::default_avatar(&new.username));

        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password,
            bio: new.bio.unwrap_or_default(),
            avatar,
            created_at: now,
            updated_at: now,
        };

        self.data.write().await.users.push(user.clone());
        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Option<User> {
        let data = self.data.read().await;
        data.users.iter().find(|u| u.username == username).cloned()
    }

    async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let data = self.data.read().await;
        data.users.iter().find(|u| u.email == email).cloned()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Option<User> {
        let data = self.data.read().await;
        data.users.iter().find(|u| u.id == id).cloned()
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let password = match changes.password.as_deref() {
            Some(p) => Some(self.hash_password(p).await?),
            None => None,
        };

        let mut data = self.data.write().await;
        let Some(user) = data.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(bio) = changes.bio {
            user.bio = bio;
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = avatar;
        }
        if let Some(password) = password {
            user.password = password;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> bool {
        let mut data = self.data.write().await;
        let Some(index) = data.users.iter().position(|u| u.id == id) else {
            return false;
        };
        data.users.remove(index);

        let owned: Vec<Uuid> = data
            .tasks
            .iter()
            .filter(|t| t.user_id == Some(id))
            .map(|t| t.id)
            .collect();
        data.tasks.retain(|t| t.user_id != Some(id));
        data.comments.retain(|c| !owned.contains(&c.task_id));

        tracing::info!(user_id = %id, tasks_removed = owned.len(), "user deleted");
        true
    }

    async fn verify_password(&self, user: &User, candidate: &str) -> StoreResult<bool> {
        let candidate = candidate.to_string();
        let hash = user.password.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash)).await??;
        Ok(matches)
    }

    async fn list_tasks(&self, filter: TaskFilter) -> Vec<Task> {
        let data = self.data.read().await;
        filter.apply(&data.tasks)
    }

    async fn get_task(&self, id: Uuid) -> Option<Task> {
        let data = self.data.read().await;
        data.tasks.iter().find(|t| t.id == id).cloned()
    }

    async fn create_task(&self, new: NewTask) -> Task {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description.unwrap_or_default(),
            status: new.status.unwrap_or_default(),
            priority: new.priority.unwrap_or_default(),
            due_date: new.due_date,
            tags: new.tags.unwrap_or_default(),
            user_id: new.user_id,
            created_by: new.created_by.unwrap_or_else(|| GUEST_NAME.to_string()),
            created_at: now,
            updated_at: now,
        };

        self.data.write().await.tasks.push(task.clone());
        tracing::info!(task_id = %task.id, owner = ?task.user_id, "task created");
        task
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Option<Task> {
        let mut data = self.data.write().await;
        let task = data.tasks.iter_mut().find(|t| t.id == id)?;

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = changes.tags {
            task.tags = tags;
        }
        task.updated_at = Utc::now();

        Some(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> bool {
        let mut data = self.data.write().await;
        let Some(index) = data.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        data.tasks.remove(index);
        data.comments.retain(|c| c.task_id != id);
        true
    }

    async fn stats(&self, scope: OwnerScope) -> TaskStats {
        let data = self.data.read().await;
        TaskStats::compute(&data.tasks, scope, Utc::now())
    }

    async fn comments_for_task(&self, task_id: Uuid) -> Vec<Comment> {
        let data = self.data.read().await;
        let mut comments: Vec<Comment> = data
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        comments
    }

    async fn create_comment(&self, new: NewComment) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            task_id: new.task_id,
            user_id: new.user_id,
            username: new.username.unwrap_or_else(|| GUEST_NAME.to_string()),
            avatar: new.avatar,
            content: new.content,
            created_at: Utc::now(),
        };

        self.data.write().await.comments.push(comment.clone());
        comment
    }

    async fn delete_comment(&self, id: Uuid) -> bool {
        let mut data = self.data.write().await;
        let Some(index) = data.comments.iter().position(|c| c.id == id) else {
            return false;
        };
        data.comments.remove(index);
        true
    }

    async fn counts(&self) -> StoreCounts {
        let data = self.data.read().await;
        StoreCounts {
            users: data.users.len(),
            tasks: data.tasks.len(),
            comments: data.comments.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost keeps the suite fast
    fn store() -> MemoryStore {
        MemoryStore::new(4)
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password: "secret".to_string(),
            ..NewUser::default()
        }
    }

    fn new_task(title: &str, owner: Option<&User>) -> NewTask {
        NewTask {
            title: title.to_string(),
            user_id: owner.map(|u| u.id),
            created_by: owner.map(|u| u.username.clone()),
            ..NewTask::default()
        }
    }

    #[tokio::test]
    async fn created_user_is_found_by_every_key() {
        let store = store();
        let user = store.create_user(new_user("alice")).await.unwrap();

        assert_ne!(user.password, "secret");
        assert_eq!(user.avatar, User::default_avatar("alice"));
        assert_eq!(store.find_user_by_username("alice").await.unwrap().id, user.id);
        assert_eq!(store.find_user_by_email("alice@example.com").await.unwrap().id, user.id);
        assert_eq!(store.find_user_by_id(user.id).await.unwrap().username, "alice");
        assert!(store.find_user_by_username("bob").await.is_none());
    }

    #[tokio::test]
    async fn password_verification_uses_the_hash() {
        let store = store();
        let user = store.create_user(new_user("alice")).await.unwrap();
        assert!(store.verify_password(&user, "secret").await.unwrap());
        assert!(!store.verify_password(&user, "wrong").await.unwrap());
    }

    #[tokio::test]
    async fn update_user_merges_and_rehashes() {
        let store = store();
        let user = store.create_user(new_user("alice")).await.unwrap();

        let updated = store
            .update_user(
                user.id,
                UserChanges {
                    bio: Some("hello".into()),
                    password: Some("changed".into()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.bio, "hello");
        assert_eq!(updated.email, user.email);
        assert!(updated.updated_at >= user.updated_at);
        assert!(store.verify_password(&updated, "changed").await.unwrap());
        assert!(!store.verify_password(&updated, "secret").await.unwrap());

        let missing = store.update_user(Uuid::new_v4(), UserChanges::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_user_cascades_to_tasks_and_comments() {
        let store = store();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();

        let owned = store.create_task(new_task("alice's", Some(&alice))).await;
        let kept = store.create_task(new_task("bob's", Some(&bob))).await;
        let guest = store.create_task(new_task("guest", None)).await;
        store
            .create_comment(NewComment {
                task_id: owned.id,
                content: "gone soon".into(),
                ..NewComment::default()
            })
            .await;

        assert!(store.delete_user(alice.id).await);
        assert!(!store.delete_user(alice.id).await);

        assert!(store.find_user_by_username("alice").await.is_none());
        assert!(store.find_user_by_email("alice@example.com").await.is_none());
        assert!(store.get_task(owned.id).await.is_none());
        assert!(store.comments_for_task(owned.id).await.is_empty());
        assert!(store.get_task(kept.id).await.is_some());
        assert!(store.get_task(guest.id).await.is_some());
    }

    #[tokio::test]
    async fn create_task_applies_defaults() {
        let store = store();
        let task = store.create_task(new_task("Buy milk", None)).await;

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.description, "");
        assert!(task.tags.is_empty());
        assert!(task.user_id.is_none());
        assert_eq!(task.created_by, GUEST_NAME);
    }

    #[tokio::test]
    async fn update_task_allows_any_status_transition_and_clears_due_date() {
        let store = store();
        let task = store
            .create_task(NewTask {
                title: "t".into(),
                status: Some(TaskStatus::Completed),
                due_date: Some(Utc::now()),
                ..NewTask::default()
            })
            .await;

        let updated = store
            .update_task(
                task.id,
                TaskChanges {
                    status: Some(TaskStatus::Todo),
                    due_date: Some(None),
                    ..TaskChanges::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Todo);
        assert!(updated.due_date.is_none());
        assert_eq!(updated.title, "t");
        assert!(store.update_task(Uuid::new_v4(), TaskChanges::default()).await.is_none());
    }

    #[tokio::test]
    async fn delete_task_cascades_to_comments() {
        let store = store();
        let task = store.create_task(new_task("t", None)).await;
        let other = store.create_task(new_task("other", None)).await;
        for (task_id, content) in [(task.id, "one"), (task.id, "two"), (other.id, "three")] {
            store
                .create_comment(NewComment {
                    task_id,
                    content: content.into(),
                    ..NewComment::default()
                })
                .await;
        }

        assert!(store.delete_task(task.id).await);
        assert!(store.comments_for_task(task.id).await.is_empty());
        assert_eq!(store.comments_for_task(other.id).await.len(), 1);
        assert!(!store.delete_task(task.id).await);
    }

    #[tokio::test]
    async fn comments_are_oldest_first_and_default_to_guest() {
        let store = store();
        let task = store.create_task(new_task("t", None)).await;
        for content in ["first", "second", "third"] {
            store
                .create_comment(NewComment {
                    task_id: task.id,
                    content: content.into(),
                    ..NewComment::default()
                })
                .await;
        }

        let comments = store.comments_for_task(task.id).await;
        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert!(comments.iter().all(|c| c.username == GUEST_NAME && c.user_id.is_none()));

        assert!(store.delete_comment(comments[1].id).await);
        assert!(!store.delete_comment(comments[1].id).await);
        assert_eq!(store.comments_for_task(task.id).await.len(), 2);
    }

    #[tokio::test]
    async fn listing_and_stats_respect_owner_scope() {
        let store = store();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        store.create_task(new_task("guest", None)).await;
        store.create_task(new_task("mine", Some(&alice))).await;

        let guest = store.list_tasks(TaskFilter::for_owner(OwnerScope::Guest)).await;
        assert_eq!(guest.len(), 1);
        assert!(guest[0].user_id.is_none());

        let mine = store.stats(OwnerScope::User(alice.id)).await;
        assert_eq!(mine.total_tasks, 1);
        assert_eq!(store.stats(OwnerScope::Any).await.total_tasks, 2);
    }
}
