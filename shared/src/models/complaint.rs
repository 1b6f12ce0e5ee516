//! Complaint Model
//!
//! 投诉记录：生命周期状态 + SLA 升级相关字段

use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;

/// Complaint category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Technical,
    Billing,
    Service,
    General,
    Urgent,
    Harassment,
    Discrimination,
    Safety,
    PolicyViolation,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "TECHNICAL",
            Category::Billing => "BILLING",
            Category::Service => "SERVICE",
            Category::General => "GENERAL",
            Category::Urgent => "URGENT",
            Category::Harassment => "HARASSMENT",
            Category::Discrimination => "DISCRIMINATION",
            Category::Safety => "SAFETY",
            Category::PolicyViolation => "POLICY_VIOLATION",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint priority tier (drives the SLA windows)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint lifecycle status
///
/// Resolved / Closed 为终态（Reopened 可以复活）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Submitted,
    InProgress,
    UnderReview,
    Resolved,
    Closed,
    Escalated,
    PendingInfo,
    Reopened,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Submitted => "SUBMITTED",
            Status::InProgress => "IN_PROGRESS",
            Status::UnderReview => "UNDER_REVIEW",
            Status::Resolved => "RESOLVED",
            Status::Closed => "CLOSED",
            Status::Escalated => "ESCALATED",
            Status::PendingInfo => "PENDING_INFO",
            Status::Reopened => "REOPENED",
        }
    }

    /// Whether the complaint no longer counts toward anyone's open workload
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Resolved | Status::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub subcategory: Option<String>,
    pub priority: Priority,
    pub status: Status,
    /// Owner (absent for fully anonymous submissions)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub is_anonymous: bool,
    /// Delivery address for owner-facing mail, captured at intake
    pub contact_email: Option<String>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub assigned_to: Option<RecordId>,
    pub resolution: Option<String>,
    /// Unix millis, set when status reaches RESOLVED / CLOSED
    pub resolved_at: Option<i64>,
    /// Unix millis of the most recent escalation (the cool-down watermark)
    pub escalated_at: Option<i64>,
    pub escalation_reason: Option<String>,
    /// Unix millis
    pub due_date: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    /// Submitter-declared urgency, 1..=10
    pub urgency_level: Option<i32>,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&Category::PolicyViolation).unwrap(),
            "\"POLICY_VIOLATION\""
        );
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let p: Priority = serde_json::from_str("\"CRITICAL\"").unwrap();
        assert_eq!(p, Priority::Critical);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(Status::Resolved.is_terminal());
        assert!(Status::Closed.is_terminal());
        assert!(!Status::Escalated.is_terminal());
        assert!(!Status::Reopened.is_terminal());
    }
}
