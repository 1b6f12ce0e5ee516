//! Daily Analytics Model (每日快照)

use crate::models::{Category, Priority, Status};
use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Complaint count for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: i64,
}

/// Complaint count for one priority tier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: i64,
}

/// Complaint count for one lifecycle status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCount {
    pub status: Status,
    pub count: i64,
}

/// Daily complaint statistics snapshot
///
/// 每天 00:00 (UTC) 对刚结束的那一天做一次汇总，确定性 ID
/// `daily_{YYYYMMDD}` 保证重复执行只会覆盖同一条记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAnalytics {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Calendar date "YYYY-MM-DD" (UTC)
    pub date: String,
    /// Complaints created on this date
    pub total_complaints: i64,
    /// Complaints resolved on this date
    pub resolved_complaints: i64,
    /// Complaints escalated on this date
    pub escalated_complaints: i64,
    /// Mean of (resolved_at - created_at) over complaints resolved on this
    /// date, in millis
    pub average_resolution_millis: Option<f64>,
    pub category_breakdown: Vec<CategoryCount>,
    pub priority_breakdown: Vec<PriorityCount>,
    pub status_breakdown: Vec<StatusCount>,
    /// Unix millis
    pub created_at: i64,
}
