//! Notification Model
//!
//! In-app notification records. Delivery/rendering belongs to the client;
//! the server only enqueues rows.

use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Notification type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    ComplaintCreated,
    StatusUpdated,
    Assigned,
    Escalated,
    Resolved,
    CommentAdded,
    DueDateApproaching,
    Overdue,
    AutoEscalated,
}

/// Stored notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user_id: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub complaint_id: Option<RecordId>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub is_read: bool,
    /// Unix millis
    pub read_at: Option<i64>,
    /// Unix millis
    pub created_at: i64,
}

/// Create notification payload
#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub user_id: RecordId,
    pub complaint_id: Option<RecordId>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}
