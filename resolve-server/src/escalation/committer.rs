//! 升级提交
//!
//! 把评估结果落库：状态/优先级/指派的原子 patch + 历史追加，
//! 然后入队站内通知和邮件（均为尽力而为，不参与事务）。
//!
//! 副作用只增不改——即使冷却窗口内被触发两次，每次提交都会产生
//! 新的历史记录；去重靠评估器的冷却过滤，不靠这里。

use crate::db::repository::{
    ComplaintRepository, NotificationRepository, RepoError, RepoResult,
};
use crate::escalation::AssignmentResolver;
use crate::services::email::{EmailDispatcher, EmailJob};
use shared::models::{Complaint, NotificationCreate, NotificationKind, Priority};
use surrealdb::RecordId;

/// 自动升级提交器
///
/// 手动升级走同一个入口（原因加 "MANUAL ESCALATION: " 前缀），
/// 绕过规则评估但复用提交路径。
#[derive(Clone)]
pub struct EscalationCommitter {
    complaints: ComplaintRepository,
    notifications: NotificationRepository,
    resolver: AssignmentResolver,
    email: EmailDispatcher,
}

impl EscalationCommitter {
    pub fn new(
        complaints: ComplaintRepository,
        notifications: NotificationRepository,
        resolver: AssignmentResolver,
        email: EmailDispatcher,
    ) -> Self {
        Self {
            complaints,
            notifications,
            resolver,
            email,
        }
    }

    /// 提交一次升级
    ///
    /// 返回 `Ok(false)` 表示投诉已不存在（并发删除），按无操作处理。
    /// `escalate_to` 仅手动升级会传；自动路径走指派解析。
    pub async fn commit(
        &self,
        complaint_id: &RecordId,
        reason: &str,
        new_priority: Option<Priority>,
        escalate_to: Option<RecordId>,
        now: i64,
    ) -> RepoResult<bool> {
        // 1. Re-fetch；不存在 → 良性竞争，静默跳过
        let Some(complaint) = self.complaints.find_by_id(complaint_id).await? else {
            return Ok(false);
        };

        let resolved_priority = new_priority.unwrap_or(complaint.priority);

        // 2. 指派：显式指定优先，否则规则 → 工作量均衡
        let assignee = match escalate_to {
            Some(user) => Some(user),
            None => {
                self.resolver
                    .resolve(complaint.category, resolved_priority)
                    .await?
            }
        };

        // 3. 原子 patch + 历史追加
        let escalation_reason = format!("AUTO-ESCALATED: {}", reason);
        let history_notes = format!(
            "AUTO-ESCALATED: {}. Priority changed from {} to {}.",
            reason, complaint.priority, resolved_priority
        );
        self.complaints
            .apply_escalation(
                complaint_id,
                complaint.status,
                resolved_priority,
                &escalation_reason,
                &history_notes,
                assignee.as_ref(),
                now,
            )
            .await?;

        // 4-5. 站内通知（入队失败只记日志，升级已提交）
        self.enqueue_notifications(
            complaint_id,
            &complaint,
            assignee.as_ref(),
            reason,
            resolved_priority,
        )
        .await;

        // 6. 邮件：fire-and-forget，绝不阻塞扫描
        self.email.dispatch(EmailJob {
            complaint_id: complaint_id.clone(),
            reason: reason.to_string(),
            new_priority: resolved_priority,
        });

        tracing::info!(
            complaint = %complaint_id,
            priority = %resolved_priority,
            assignee = ?assignee.as_ref().map(|a| a.to_string()),
            "Escalation committed: {}",
            reason
        );

        Ok(true)
    }

    /// 手动升级入口
    ///
    /// 与自动路径的区别：投诉不存在是用户可见的错误（fail fast），
    /// 原因带 "MANUAL ESCALATION: " 前缀，且显式 `escalate_to` 生效。
    pub async fn manual_escalation(
        &self,
        complaint_id: &RecordId,
        reason: &str,
        escalate_to: Option<RecordId>,
        new_priority: Option<Priority>,
        now: i64,
    ) -> RepoResult<()> {
        if self.complaints.find_by_id(complaint_id).await?.is_none() {
            return Err(RepoError::NotFound(format!(
                "Complaint {} not found",
                complaint_id
            )));
        }

        let reason = format!("MANUAL ESCALATION: {}", reason);
        self.commit(complaint_id, &reason, new_priority, escalate_to, now)
            .await?;
        Ok(())
    }

    async fn enqueue_notifications(
        &self,
        complaint_id: &RecordId,
        complaint: &Complaint,
        assignee: Option<&RecordId>,
        reason: &str,
        new_priority: Priority,
    ) {
        // 匿名投诉不打扰提交人
        if let Some(owner) = complaint.user_id.as_ref().filter(|_| !complaint.is_anonymous) {
            let result = self
                .notifications
                .enqueue(NotificationCreate {
                    user_id: owner.clone(),
                    complaint_id: Some(complaint_id.clone()),
                    title: "🚨 Complaint Auto-Escalated".to_string(),
                    message: format!(
                        "Your complaint \"{}\" has been automatically escalated for faster resolution. Reason: {}",
                        complaint.title, reason
                    ),
                    kind: NotificationKind::AutoEscalated,
                })
                .await;
            if let Err(e) = result {
                tracing::error!("Failed to enqueue owner notification: {}", e);
            }
        }

        if let Some(assignee) = assignee {
            let result = self
                .notifications
                .enqueue(NotificationCreate {
                    user_id: assignee.clone(),
                    complaint_id: Some(complaint_id.clone()),
                    title: "⚡ Urgent: Complaint Auto-Escalated".to_string(),
                    message: format!(
                        "Complaint \"{}\" has been auto-escalated and assigned to you. Priority: {}. Reason: {}",
                        complaint.title, new_priority, reason
                    ),
                    kind: NotificationKind::AutoEscalated,
                })
                .await;
            if let Err(e) = result {
                tracing::error!("Failed to enqueue assignee notification: {}", e);
            }
        }
    }
}
