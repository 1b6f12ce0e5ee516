//! Complaint Repository
//!
//! 投诉表的读写。升级提交 (patch + history) 在单个事务里完成，
//! 崩溃不会留下没有历史记录的状态变更。

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use shared::models::{Complaint, Priority, Status};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ComplaintRepository {
    base: BaseRepository,
}

impl ComplaintRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find complaint by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Complaint>> {
        let complaint: Option<Complaint> = self.base.db().select(id.clone()).await?;
        Ok(complaint)
    }

    /// Create a complaint (intake is external; used by tests and seeding)
    pub async fn create(&self, data: Complaint) -> RepoResult<Complaint> {
        let created: Option<Complaint> = self.base.db().create("complaint").content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create complaint".to_string()))
    }

    /// 升级候选：非终态，且最近一次升级早于 `cooldown_cutoff`（或从未升级过）
    ///
    /// `escalated_at` 是去重水位线——冷却窗口内的投诉直接排除，
    /// 这是防止每次扫描重复升级同一投诉的主要机制。
    pub async fn find_escalation_candidates(
        &self,
        cooldown_cutoff: i64,
    ) -> RepoResult<Vec<Complaint>> {
        let complaints: Vec<Complaint> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM complaint
                WHERE status NOT IN ['RESOLVED', 'CLOSED']
                AND (escalated_at = NONE OR escalated_at = NULL OR escalated_at < $cutoff)
                ORDER BY created_at"#,
            )
            .bind(("cutoff", cooldown_cutoff))
            .await?
            .take(0)?;
        Ok(complaints)
    }

    /// 某员工当前的未结投诉数（工作量）
    ///
    /// 每次指派决策前重新查询，不跨扫描缓存。
    pub async fn count_open_by_assignee(&self, user_id: &RecordId) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                r#"SELECT count() AS count FROM complaint
                WHERE assigned_to = $user AND status NOT IN ['RESOLVED', 'CLOSED']
                GROUP ALL"#,
            )
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }

    /// 原子提交升级：状态/优先级/指派 patch + 追加历史记录
    ///
    /// 两个写操作在一个事务里，要么都生效要么都不生效。
    /// 投诉在提交瞬间被并发删除时事务 THROW，由调用方决定如何处理。
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_escalation(
        &self,
        id: &RecordId,
        previous_status: Status,
        new_priority: Priority,
        escalation_reason: &str,
        history_notes: &str,
        assignee: Option<&RecordId>,
        now: i64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;

                LET $found = (SELECT VALUE id FROM $complaint);
                IF array::len($found) == 0 {
                    THROW "complaint vanished during escalation commit"
                };

                UPDATE $complaint SET
                    status = 'ESCALATED',
                    priority = $priority,
                    escalated_at = $now,
                    escalation_reason = $reason,
                    assigned_to = IF $has_assignee THEN $assignee ELSE assigned_to END,
                    updated_at = $now;

                CREATE status_history CONTENT {
                    complaint_id: $cid,
                    status: 'ESCALATED',
                    previous_status: $previous_status,
                    changed_by: NONE,
                    changed_by_name: 'System (Auto-Escalation)',
                    notes: $notes,
                    timestamp: $now,
                    is_system_generated: true
                };

                COMMIT TRANSACTION;
                "#,
            )
            .bind(("complaint", id.clone()))
            .bind(("cid", id.to_string()))
            .bind(("priority", new_priority))
            .bind(("previous_status", previous_status))
            .bind(("reason", escalation_reason.to_string()))
            .bind(("notes", history_notes.to_string()))
            .bind(("has_assignee", assignee.is_some()))
            .bind(("assignee", assignee.map(|a| a.to_string())))
            .bind(("now", now))
            .await?
            .check()?;
        Ok(())
    }

    /// 升级审查队列：所有 ESCALATED 状态的投诉，最早升级的在前
    pub async fn find_pending_escalations(&self) -> RepoResult<Vec<Complaint>> {
        let complaints: Vec<Complaint> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM complaint
                WHERE status = 'ESCALATED'
                ORDER BY escalated_at"#,
            )
            .await?
            .take(0)?;
        Ok(complaints)
    }

    // ========================================================================
    // Analytics Queries (daily snapshot job)
    // ========================================================================

    /// Complaints created in [start, end)
    pub async fn find_created_between(&self, start: i64, end: i64) -> RepoResult<Vec<Complaint>> {
        let complaints: Vec<Complaint> = self
            .base
            .db()
            .query("SELECT * FROM complaint WHERE created_at >= $start AND created_at < $end")
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(complaints)
    }

    /// Complaints resolved in [start, end)
    pub async fn find_resolved_between(&self, start: i64, end: i64) -> RepoResult<Vec<Complaint>> {
        let complaints: Vec<Complaint> = self
            .base
            .db()
            .query("SELECT * FROM complaint WHERE resolved_at >= $start AND resolved_at < $end")
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(complaints)
    }

    /// Count of complaints escalated in [start, end)
    pub async fn count_escalated_between(&self, start: i64, end: i64) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                r#"SELECT count() AS count FROM complaint
                WHERE escalated_at >= $start AND escalated_at < $end
                GROUP ALL"#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }
}
