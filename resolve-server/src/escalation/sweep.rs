//! 扫描编排
//!
//! 单次扫描：Fetching → Evaluating → Committing(×N) → Idle。
//! 除了投诉自身的 `escalated_at` 水位线，不持有任何跨扫描状态：
//! 扫描中途崩溃，已提交的升级保持生效，未提交的下次扫描重新评估。

use crate::db::repository::{ComplaintRepository, RepoResult, StatusHistoryRepository};
use crate::escalation::committer::EscalationCommitter;
use crate::escalation::rules;

/// 一次扫描的结果，汇报给调度器日志
#[derive(Debug, Clone, Copy)]
pub struct SweepOutcome {
    /// 参与评估的投诉数（通过冷却过滤的）
    pub processed: usize,
    /// 实际提交升级的投诉数
    pub escalated: usize,
    /// 本次扫描捕获的时钟 T (Unix millis)
    pub timestamp: i64,
}

#[derive(Clone)]
pub struct EscalationSweep {
    complaints: ComplaintRepository,
    history: StatusHistoryRepository,
    committer: EscalationCommitter,
}

impl EscalationSweep {
    pub fn new(
        complaints: ComplaintRepository,
        history: StatusHistoryRepository,
        committer: EscalationCommitter,
    ) -> Self {
        Self {
            complaints,
            history,
            committer,
        }
    }

    /// 执行一次完整扫描
    ///
    /// 时钟 T 在开头捕获一次，整批决策共用，保证批内自洽。
    /// 候选查询失败让错误冒泡（由调度器记录并等下个周期）；
    /// 单个投诉的评估/提交失败只记日志，不中断本次扫描。
    pub async fn run_once(&self) -> RepoResult<SweepOutcome> {
        let now = shared::util::now_millis();

        let candidates = self
            .complaints
            .find_escalation_candidates(rules::cool_down_cutoff(now))
            .await?;

        let mut escalated = 0;
        for complaint in &candidates {
            let Some(id) = complaint.id.as_ref() else {
                continue;
            };

            // 复杂度规则需要历史条数
            let history_count = match self.history.count_by_complaint(id).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::error!(complaint = %id, "Failed to count history, skipping: {}", e);
                    continue;
                }
            };

            let Some(decision) = rules::evaluate(complaint, history_count, now) else {
                continue;
            };

            match self
                .committer
                .commit(id, &decision.reason, Some(decision.new_priority), None, now)
                .await
            {
                Ok(true) => escalated += 1,
                Ok(false) => {
                    tracing::debug!(complaint = %id, "Complaint gone before commit, skipped");
                }
                Err(e) => {
                    // 下次扫描自然重试
                    tracing::error!(complaint = %id, "Escalation commit failed: {}", e);
                }
            }
        }

        Ok(SweepOutcome {
            processed: candidates.len(),
            escalated,
            timestamp: now,
        })
    }
}
