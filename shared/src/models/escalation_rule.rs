//! Escalation Rule Model
//!
//! 管理端配置的升级路由规则，按 (category, priority) 定向指派

use crate::models::{Category, Priority};
use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Configured escalation route for a (category, priority) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRule {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub category: Category,
    pub priority: Priority,
    /// Configured SLA hours (informational; the sweep carries its own
    /// rule constants)
    pub auto_escalate_after_hours: i64,
    /// Target user escalations matching this rule are assigned to
    #[serde(with = "serde_helpers::record_id")]
    pub escalate_to: RecordId,
    pub is_active: bool,
    pub conditions: Option<Vec<String>>,
}
