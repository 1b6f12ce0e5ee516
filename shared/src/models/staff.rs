//! Staff Model

use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    User,
    Admin,
    Moderator,
    SuperAdmin,
}

/// Staff directory entry
///
/// `user_id` 指向账号记录（认证系统外部维护），投诉的 assigned_to
/// 存的就是这个引用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffProfile {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user_id: RecordId,
    pub display_name: String,
    /// Delivery address for assignee-facing mail
    pub email: Option<String>,
    pub role: StaffRole,
    pub department: Option<String>,
    pub is_active: bool,
    /// Unix millis (directory ordering for deterministic tie-breaks)
    pub created_at: i64,
}
