//! 指派解析
//!
//! 规则未指定接收人时，按最少工作量 + 角色优先级选人。
//! 工作量每次决策前重新查询——同一次扫描里连续两次升级
//! 必须看到前一次提交后的最新负载，否则会不公平地压到同一个人。

use crate::db::repository::{
    ComplaintRepository, EscalationRuleRepository, RepoResult, StaffRepository,
};
use shared::models::{Category, Priority, StaffRole};
use surrealdb::RecordId;

/// 角色平局优先级：值小者先选（高级角色优先）
fn role_rank(role: StaffRole) -> u8 {
    match role {
        StaffRole::SuperAdmin => 0,
        StaffRole::Admin => 1,
        StaffRole::Moderator => 2,
        StaffRole::User => 3,
    }
}

#[derive(Clone)]
pub struct AssignmentResolver {
    rules: EscalationRuleRepository,
    staff: StaffRepository,
    complaints: ComplaintRepository,
}

impl AssignmentResolver {
    pub fn new(
        rules: EscalationRuleRepository,
        staff: StaffRepository,
        complaints: ComplaintRepository,
    ) -> Self {
        Self {
            rules,
            staff,
            complaints,
        }
    }

    /// Resolve the destination assignee for an escalation
    ///
    /// 1. 匹配的 active 规则 → 规则配置的接收人
    /// 2. 否则在 active 的 ADMIN/MODERATOR/SUPER_ADMIN 里按
    ///    (工作量升序, 角色优先级) 稳定排序取第一个
    /// 3. 没有候选人 → None（升级照常进行，只是无人指派）
    pub async fn resolve(
        &self,
        category: Category,
        priority: Priority,
    ) -> RepoResult<Option<RecordId>> {
        if let Some(rule) = self.rules.find_active(category, priority).await? {
            return Ok(Some(rule.escalate_to));
        }

        let staff = self.staff.list_active_escalation_targets().await?;
        if staff.is_empty() {
            return Ok(None);
        }

        let mut candidates = Vec::with_capacity(staff.len());
        for member in staff {
            let workload = self.complaints.count_open_by_assignee(&member.user_id).await?;
            candidates.push((workload, role_rank(member.role), member.user_id));
        }

        // sort_by_key 是稳定排序：(工作量, 角色) 全同的候选人保持目录顺序
        candidates.sort_by_key(|(workload, rank, _)| (*workload, *rank));

        Ok(candidates.into_iter().next().map(|(_, _, user_id)| user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_rank_favors_senior_roles() {
        assert!(role_rank(StaffRole::SuperAdmin) < role_rank(StaffRole::Admin));
        assert!(role_rank(StaffRole::Admin) < role_rank(StaffRole::Moderator));
        assert!(role_rank(StaffRole::Moderator) < role_rank(StaffRole::User));
    }
}
