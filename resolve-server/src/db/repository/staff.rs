//! Staff Repository
//!
//! 员工目录查询。只有 active 的 ADMIN / MODERATOR / SUPER_ADMIN
//! 是升级指派的合法目标。

use super::{BaseRepository, RepoResult};
use shared::models::StaffProfile;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// 可接收升级的在职员工
    ///
    /// 按 created_at 排序保证目录顺序稳定——(工作量, 角色) 完全相同的
    /// 候选人保持原始顺序，指派结果可复现。
    pub async fn list_active_escalation_targets(&self) -> RepoResult<Vec<StaffProfile>> {
        let staff: Vec<StaffProfile> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM staff_profile
                WHERE role IN ['ADMIN', 'MODERATOR', 'SUPER_ADMIN'] AND is_active = true
                ORDER BY created_at"#,
            )
            .await?
            .take(0)?;
        Ok(staff)
    }

    /// Find the staff profile for a user reference (email lookup)
    pub async fn find_by_user_id(&self, user_id: &RecordId) -> RepoResult<Option<StaffProfile>> {
        let staff: Vec<StaffProfile> = self
            .base
            .db()
            .query("SELECT * FROM staff_profile WHERE user_id = $user LIMIT 1")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(staff.into_iter().next())
    }

    /// Create a staff profile (directory maintenance is external; used by tests)
    pub async fn create(&self, data: StaffProfile) -> RepoResult<StaffProfile> {
        let created: Option<StaffProfile> = self
            .base
            .db()
            .create("staff_profile")
            .content(data)
            .await?;
        created.ok_or_else(|| {
            super::RepoError::Database("Failed to create staff profile".to_string())
        })
    }
}
