//! Shared types for the ResolveIt case server
//!
//! Domain entities (complaints, status history, escalation rules, staff,
//! notifications, analytics snapshots) and the serde helpers they need to
//! round-trip through SurrealDB and JSON APIs.

pub mod models;
pub mod serde_helpers;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Category, Complaint, DailyAnalytics, EscalationRule, Notification, NotificationKind, Priority,
    StaffProfile, StaffRole, Status, StatusHistoryEntry,
};
