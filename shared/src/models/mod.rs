//! Domain Models
//!
//! Entities stored in SurrealDB plus the enums they share. Record links use
//! [`crate::serde_helpers`] so ids read back from the database and ids sent
//! over JSON both deserialize into `RecordId`.

pub mod analytics;
pub mod complaint;
pub mod escalation_rule;
pub mod notification;
pub mod staff;
pub mod status_history;

// Re-exports
pub use analytics::{CategoryCount, DailyAnalytics, PriorityCount, StatusCount};
pub use complaint::{Category, Complaint, Priority, Status};
pub use escalation_rule::EscalationRule;
pub use notification::{Notification, NotificationCreate, NotificationKind};
pub use staff::{StaffProfile, StaffRole};
pub use status_history::StatusHistoryEntry;
