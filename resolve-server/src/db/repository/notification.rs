//! Notification Repository
//!
//! 站内通知的入队。投递和渲染归客户端，这里只写行。

use super::{BaseRepository, RepoError, RepoResult};
use shared::models::{Notification, NotificationCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Enqueue a notification (created unread)
    pub async fn enqueue(&self, data: NotificationCreate) -> RepoResult<Notification> {
        let notification = Notification {
            id: None,
            user_id: data.user_id,
            complaint_id: data.complaint_id,
            title: data.title,
            message: data.message,
            kind: data.kind,
            is_read: false,
            read_at: None,
            created_at: shared::util::now_millis(),
        };

        let created: Option<Notification> = self
            .base
            .db()
            .create("notification")
            .content(notification)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// All notifications for a user, newest first (used by tests)
    pub async fn find_by_user(
        &self,
        user_id: &surrealdb::RecordId,
    ) -> RepoResult<Vec<Notification>> {
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM notification
                WHERE user_id = $user
                ORDER BY created_at DESC"#,
            )
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(notifications)
    }
}
