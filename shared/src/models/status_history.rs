//! Status History Model
//!
//! Append-only ledger of complaint status transitions. Entries are never
//! mutated or deleted after creation.

use crate::models::Status;
use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One status transition in a complaint's audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub complaint_id: RecordId,
    /// Status after the transition
    pub status: Status,
    pub previous_status: Option<Status>,
    /// Acting user, absent for system-generated transitions
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub changed_by: Option<RecordId>,
    pub changed_by_name: Option<String>,
    pub notes: Option<String>,
    /// Unix millis
    pub timestamp: i64,
    #[serde(default)]
    pub is_system_generated: bool,
}
