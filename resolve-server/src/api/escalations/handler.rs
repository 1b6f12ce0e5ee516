//! Escalation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{Complaint, Priority, StatusHistoryEntry};

/// 路径参数可以是纯 key 或完整 "complaint:key"
fn parse_complaint_id(id: &str) -> AppResult<RecordId> {
    if id.contains(':') {
        id.parse()
            .map_err(|_| AppError::Validation(format!("Invalid complaint id: {}", id)))
    } else {
        Ok(RecordId::from_table_key("complaint", id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ManualEscalationRequest {
    #[validate(length(min = 1, message = "reason must not be empty"))]
    pub reason: String,
    /// 显式接收人（用户引用，"user:xxx"）
    pub escalate_to: Option<String>,
    /// 手动升级只允许 HIGH / CRITICAL
    pub new_priority: Option<Priority>,
}

#[derive(Serialize)]
pub struct ManualEscalationResponse {
    pub success: bool,
}

/// POST /api/complaints/:id/escalate - 手动升级
///
/// 绕过规则评估，直接走提交路径；投诉不存在返回 404。
pub async fn manual_escalate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ManualEscalationRequest>,
) -> AppResult<Json<ManualEscalationResponse>> {
    payload.validate()?;

    if let Some(p) = payload.new_priority
        && !matches!(p, Priority::High | Priority::Critical)
    {
        return Err(AppError::Validation(
            "new_priority must be HIGH or CRITICAL".to_string(),
        ));
    }

    let complaint_id = parse_complaint_id(&id)?;
    let escalate_to = payload
        .escalate_to
        .as_deref()
        .map(|s| {
            s.parse::<RecordId>()
                .map_err(|_| AppError::Validation(format!("Invalid escalate_to: {}", s)))
        })
        .transpose()?;

    state
        .committer
        .manual_escalation(
            &complaint_id,
            &payload.reason,
            escalate_to,
            payload.new_priority,
            shared::util::now_millis(),
        )
        .await?;

    Ok(Json(ManualEscalationResponse { success: true }))
}

/// GET /api/complaints/:id/history - 状态流转账本（新的在前）
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<StatusHistoryEntry>>> {
    let complaint_id = parse_complaint_id(&id)?;

    // 投诉必须存在，空账本和不存在的投诉要区分开
    if state.complaints.find_by_id(&complaint_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Complaint {} not found", id)));
    }

    let entries = state.history.find_by_complaint(&complaint_id).await?;
    Ok(Json(entries))
}

/// GET /api/escalations/pending - 升级审查队列（最早升级的在前）
pub async fn pending(State(state): State<ServerState>) -> AppResult<Json<Vec<Complaint>>> {
    let complaints = state.complaints.find_pending_escalations().await?;
    Ok(Json(complaints))
}
