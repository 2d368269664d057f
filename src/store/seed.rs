use chrono::{Duration, Utc};
use uuid::Uuid;

use super::memory::MemoryStore;
use super::models::*;
use super::StoreResult;

const DEMO_USERS: &[(&str, &str, &str, &str)] = &[
    ("testuser", "test@example.com", "password123", "Test User"),
    ("admin", "admin@example.com", "admin123", "Admin User"),
];

impl MemoryStore {
    /// Load the fixed demo accounts and sample tasks.
    pub async fn seed_demo_data(&self) -> StoreResult<()> {
        let now = Utc::now();
        let mut seeded = Vec::with_capacity(DEMO_USERS.len());

        for (username, email, password, bio) in DEMO_USERS {
            let user = User {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email: email.to_string(),
                password: self.hash_password(password).await?,
                bio: bio.to_string(),
                avatar: User::default_avatar(username),
                created_at: now,
                updated_at: now,
            };
            self.insert_user(user.clone()).await;
            seeded.push(user);
        }

        self.insert_task(Task {
            id: Uuid::new_v4(),
            title: "Welcome to TaskFlow".to_string(),
            description: "This is a sample task. You can create, edit, and delete tasks!".to_string(),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: Some(now + Duration::days(7)),
            tags: vec!["welcome".to_string(), "sample".to_string()],
            user_id: None,
            created_by: GUEST_NAME.to_string(),
            created_at: now,
            updated_at: now,
        })
        .await;

        if let Some(test_user) = seeded.first() {
            self.insert_task(Task {
                id: Uuid::new_v4(),
                title: "Complete project documentation".to_string(),
                description: "Write comprehensive documentation for the project".to_string(),
                status: TaskStatus::InProgress,
                priority: TaskPriority::Medium,
                due_date: Some(now + Duration::days(14)),
                tags: vec!["documentation".to_string(), "project".to_string()],
                user_id: Some(test_user.id),
                created_by: test_user.username.clone(),
                created_at: now,
                updated_at: now,
            })
            .await;
        }

        tracing::info!(users = seeded.len(), "demo data seeded");
        Ok(())
    }
}
